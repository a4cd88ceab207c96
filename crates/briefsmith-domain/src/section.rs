//! Section module - named report sections and their drafting instructions

/// A named subdivision of the output report
///
/// Built once from a template and read-only while summarizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpec {
    /// Section name, unique within a run
    pub name: String,

    /// Drafting instruction taken from the template (may be empty)
    pub instruction: String,

    /// Position in the template
    pub order: usize,
}

/// Ordered mapping of section name to drafting instruction
///
/// Order is the template order and drives the layout of the output document.
///
/// # Examples
///
/// ```
/// use briefsmith_domain::SectionTable;
///
/// let table = SectionTable::from_pairs([
///     ("The Pitch", "Summarize the offer."),
///     ("Rewards", "List the benefits."),
/// ]).unwrap();
///
/// assert_eq!(table.names(), vec!["The Pitch", "Rewards"]);
/// assert_eq!(table.get("Rewards").unwrap().order, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionTable {
    sections: Vec<SectionSpec>,
}

impl SectionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(name, instruction)` pairs in template order
    pub fn from_pairs<N, I>(pairs: impl IntoIterator<Item = (N, I)>) -> Result<Self, String>
    where
        N: Into<String>,
        I: Into<String>,
    {
        let mut table = Self::new();
        for (name, instruction) in pairs {
            table.push(name, instruction)?;
        }
        Ok(table)
    }

    /// Append a section at the end of the table
    ///
    /// Fails if a section with the same name already exists.
    pub fn push(
        &mut self,
        name: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Result<(), String> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(format!("Duplicate section name: {}", name));
        }
        let order = self.sections.len();
        self.sections.push(SectionSpec {
            name,
            instruction: instruction.into(),
            order,
        });
        Ok(())
    }

    /// Look up a section by name
    pub fn get(&self, name: &str) -> Option<&SectionSpec> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Section names in template order
    pub fn names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    /// Iterate sections in template order
    pub fn iter(&self) -> std::slice::Iter<'_, SectionSpec> {
        self.sections.iter()
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether the table has no sections
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl<'a> IntoIterator for &'a SectionTable {
    type Item = &'a SectionSpec;
    type IntoIter = std::slice::Iter<'a, SectionSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.sections.iter()
    }
}
