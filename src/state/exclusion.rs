//! Site exclusion types.

/// How the CLI treats the exclusion list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExclusionMode {
    /// Listed sites bypass the tunnel.
    #[default]
    General,
    /// Only listed sites go through the tunnel.
    Selective,
}

impl ExclusionMode {
    /// Case-insensitive parse of the CLI's mode word.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "general" => Some(Self::General),
            "selective" => Some(Self::Selective),
            _ => None,
        }
    }

    /// Argument for `site-exclusions mode`.
    #[must_use]
    pub const fn as_arg(self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Selective => "selective",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::General => Self::Selective,
            Self::Selective => Self::General,
        }
    }
}

impl std::fmt::Display for ExclusionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_arg())
    }
}

/// Snapshot of `site-exclusions show`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    /// `None` when no mode line was seen, which means the query produced
    /// nothing usable.
    pub mode: Option<ExclusionMode>,
    /// Hostnames in CLI order, duplicates kept.
    pub sites: Vec<String>,
}

impl ExclusionSet {
    /// Placeholder shown instead of the list, if any.
    #[must_use]
    pub fn placeholder(&self) -> Option<&'static str> {
        if self.mode.is_none() && self.sites.is_empty() {
            Some(crate::constants::MSG_EXCLUSIONS_UNAVAILABLE)
        } else if self.sites.is_empty() {
            Some(crate::constants::MSG_NO_EXCLUSIONS)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;

    #[test]
    fn test_mode_parse() {
        assert_eq!(ExclusionMode::parse("Selective"), Some(ExclusionMode::Selective));
        assert_eq!(ExclusionMode::parse(" general "), Some(ExclusionMode::General));
        assert_eq!(ExclusionMode::parse("other"), None);
        assert_eq!(ExclusionMode::General.toggled(), ExclusionMode::Selective);
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(
            ExclusionSet::default().placeholder(),
            Some(constants::MSG_EXCLUSIONS_UNAVAILABLE)
        );
        let empty = ExclusionSet {
            mode: Some(ExclusionMode::General),
            sites: Vec::new(),
        };
        assert_eq!(empty.placeholder(), Some(constants::MSG_NO_EXCLUSIONS));
        let filled = ExclusionSet {
            mode: Some(ExclusionMode::General),
            sites: vec!["example.com".into()],
        };
        assert_eq!(filled.placeholder(), None);
    }
}
