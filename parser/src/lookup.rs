//! Option name lookup over a schema's specifications.

use command_bind_core::{Specification, fold_name};

/// Resolves option names to member indices.
///
/// Indices refer to the schema's member list, so positional members keep
/// their slots even though they are never matched by name.
#[derive(Debug, Clone)]
pub struct NameLookup<'a> {
    specs: Vec<&'a Specification>,
    case_sensitive: bool,
}

impl<'a> NameLookup<'a> {
    pub fn new(specs: impl IntoIterator<Item = &'a Specification>, case_sensitive: bool) -> Self {
        Self {
            specs: specs.into_iter().collect(),
            case_sensitive,
        }
    }

    /// Finds the option whose short or long name is `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_bind_core::{Specification, ValueType};
    /// use command_bind_parser::NameLookup;
    ///
    /// let specs = [
    ///     Specification::value(0, ValueType::String),
    ///     Specification::scalar(Some('o'), Some("output"), ValueType::String),
    /// ];
    /// let lookup = NameLookup::new(&specs, false);
    /// assert_eq!(lookup.find("OUTPUT"), Some(1));
    /// assert_eq!(lookup.find("o"), Some(1));
    /// assert_eq!(lookup.find("input"), None);
    /// ```
    pub fn find(&self, name: &str) -> Option<usize> {
        self.specs.iter().position(|spec| {
            spec.as_option()
                .is_some_and(|option| option.matches(name, self.case_sensitive))
        })
    }

    /// Finds the option with short name `c`.
    pub fn find_short(&self, c: char) -> Option<usize> {
        self.specs.iter().position(|spec| {
            spec.as_option()
                .and_then(|option| option.short_name)
                .is_some_and(|short| {
                    let (mut a, mut b) = ([0u8; 4], [0u8; 4]);
                    fold_name(short.encode_utf8(&mut a), self.case_sensitive)
                        == fold_name(c.encode_utf8(&mut b), self.case_sensitive)
                })
        })
    }

    pub fn get(&self, index: usize) -> Option<&'a Specification> {
        self.specs.get(index).copied()
    }

    /// Whether the short name `c` belongs to an option that takes values.
    pub fn short_takes_value(&self, c: char) -> bool {
        self.find_short(c)
            .and_then(|index| self.get(index))
            .is_some_and(Specification::takes_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use command_bind_core::ValueType;

    #[test]
    fn test_short_lookup_respects_case() {
        let specs = [
            Specification::switch(Some('v'), None),
            Specification::scalar(Some('n'), None, ValueType::Integer),
        ];

        let sensitive = NameLookup::new(&specs, true);
        assert_eq!(sensitive.find_short('v'), Some(0));
        assert_eq!(sensitive.find_short('V'), None);
        assert!(sensitive.short_takes_value('n'));
        assert!(!sensitive.short_takes_value('v'));

        let insensitive = NameLookup::new(&specs, false);
        assert_eq!(insensitive.find_short('V'), Some(0));
    }

    #[test]
    fn test_non_ascii_names_fold_the_same_way() {
        let specs = [Specification::switch(Some('é'), None)];

        let insensitive = NameLookup::new(&specs, false);
        assert_eq!(insensitive.find("É"), Some(0));
        assert_eq!(insensitive.find_short('É'), Some(0));

        let sensitive = NameLookup::new(&specs, true);
        assert_eq!(sensitive.find("É"), None);
        assert_eq!(sensitive.find_short('É'), None);
        assert_eq!(sensitive.find("é"), Some(0));
    }
}
