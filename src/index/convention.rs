//! Directory-to-namespace convention checks (PSR-4 and PSR-0 style).

use super::options::{ConventionRule, ConventionStyle};
use crate::error::{Error, Result};
use crate::project::SourceProvider;
use crate::project::path::{relative_to, strip_extension};

/// A rule whose base directory has been resolved through the provider.
#[derive(Debug)]
pub(crate) struct PreparedRule<'r> {
    pub rule: &'r ConventionRule,
    base: String,
}

impl<'r> PreparedRule<'r> {
    pub fn prepare<P: SourceProvider + ?Sized>(rule: &'r ConventionRule, provider: &P) -> Result<Self> {
        if rule.base_dir.trim().is_empty() {
            return Err(Error::InvalidConvention {
                reason: format!("no base directory for prefix \"{}\"", rule.prefix),
            });
        }

        let base = provider.canonicalize(&rule.base_dir)?;
        Ok(Self {
            rule,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    /// Whether `class`, declared in the file at canonical `path`, sits where
    /// the rule expects it.
    pub fn conforms(&self, class: &str, path: &str) -> bool {
        let Some(relative) = relative_to(path, &self.base) else {
            return false;
        };
        let sub_path = strip_extension(relative);

        expected_sub_path(self.rule, class).is_some_and(|expected| expected == sub_path)
    }
}

/// The extension-less path, relative to the base directory, at which `rule`
/// expects `class`. `None` when the class lies outside the rule's prefix.
pub fn expected_sub_path(rule: &ConventionRule, class: &str) -> Option<String> {
    let rest = class.strip_prefix(rule.prefix.as_str())?;

    match rule.style {
        ConventionStyle::Psr4 => Some(rest.replace('\\', "/")),
        ConventionStyle::Psr0 => Some(match class.rfind('\\') {
            Some(pos) => {
                let (namespace, short) = class.split_at(pos + 1);
                format!("{}{}", namespace.replace('\\', "/"), short.replace('_', "/"))
            }
            None => class.replace('_', "/"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::MemoryFs;

    #[test]
    fn test_psr4_expected_path() {
        let rule = ConventionRule::psr4("Prefix\\", "base");

        assert_eq!(expected_sub_path(&rule, "Prefix\\Foo\\Bar").as_deref(), Some("Foo/Bar"));
        assert_eq!(expected_sub_path(&rule, "Other\\Foo\\Bar"), None);
    }

    #[test]
    fn test_psr0_expected_path() {
        let rule = ConventionRule::psr0("", "base");

        assert_eq!(
            expected_sub_path(&rule, "Ns\\Sub\\Vendor_Name").as_deref(),
            Some("Ns/Sub/Vendor/Name")
        );
        assert_eq!(expected_sub_path(&rule, "Pearlike_Foo").as_deref(), Some("Pearlike/Foo"));
    }

    #[test]
    fn test_prepared_rule_conforms() {
        let fs = MemoryFs::new().with_file("vfs://base/Foo/Bar.php", "");
        let rule = ConventionRule::psr4("Prefix", "vfs://base");
        let prepared = PreparedRule::prepare(&rule, &fs).unwrap();

        assert!(prepared.conforms("Prefix\\Foo\\Bar", "vfs://base/Foo/Bar.php"));
        assert!(!prepared.conforms("Prefix\\Wrong\\Bar", "vfs://base/Foo/Bar.php"));
        assert!(!prepared.conforms("Prefix\\Foo\\Bar", "vfs://elsewhere/Foo/Bar.php"));
    }

    #[test]
    fn test_empty_base_dir_rejected() {
        let fs = MemoryFs::new();
        let rule = ConventionRule::psr4("Prefix", "");

        assert!(matches!(
            PreparedRule::prepare(&rule, &fs),
            Err(Error::InvalidConvention { .. })
        ));
    }
}
