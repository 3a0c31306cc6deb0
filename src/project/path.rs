//! String-level path helpers.
//!
//! Paths handled by the generator may be URIs (`phar://...`) rather than
//! native paths, so these helpers work on `/`-separated strings and never
//! touch the filesystem.

/// Replace `\` separators with `/`.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Whether `path` is addressed through a URI scheme such as `phar://`.
///
/// Single-letter schemes are rejected so Windows drive letters (`C://`)
/// stay native paths.
pub fn is_stream_uri(path: &str) -> bool {
    match path.find("://") {
        Some(pos) if pos > 1 => path[..pos]
            .bytes()
            .enumerate()
            .all(|(i, b)| b.is_ascii_alphabetic() || (i > 0 && (b.is_ascii_digit() || b"+.-".contains(&b)))),
        _ => false,
    }
}

/// Normalize separators and collapse runs of `/`, keeping a URI scheme's
/// `://` intact.
pub fn collapse_slashes(path: &str) -> String {
    let path = normalize_separators(path);
    let (scheme, rest) = match path.find("://") {
        Some(pos) if is_stream_uri(&path) => path.split_at(pos + 3),
        _ => ("", path.as_str()),
    };

    let mut out = String::with_capacity(path.len());
    out.push_str(scheme);

    let mut last_slash = false;
    for c in rest.chars() {
        if c == '/' {
            if last_slash {
                continue;
            }
            last_slash = true;
        } else {
            last_slash = false;
        }
        out.push(c);
    }
    out
}

/// Extension of the last path segment, without the dot.
pub fn extension(path: &str) -> Option<&str> {
    let file = file_name(path);
    let dot = file.rfind('.')?;
    (dot > 0 || file.len() > 1).then(|| &file[dot + 1..])
}

/// Last `/`-separated segment.
pub fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// Drop the extension of the last segment, if any.
pub fn strip_extension(path: &str) -> &str {
    let start = path.len() - file_name(path).len();
    match path[start..].rfind('.') {
        Some(dot) => &path[..start + dot],
        None => path,
    }
}

/// `path` relative to `base`, both `/`-separated. `None` if `path` does not
/// live under `base`.
pub fn relative_to<'p>(path: &'p str, base: &str) -> Option<&'p str> {
    let base = base.trim_end_matches('/');
    let rest = path.strip_prefix(base)?;
    if base.is_empty() {
        return Some(rest.trim_start_matches('/'));
    }
    rest.strip_prefix('/')
}

/// Whether any directory segment of `path` equals one of `names`,
/// ignoring ASCII case. The final (file) segment is not considered.
pub fn has_dir_segment<S: AsRef<str>>(path: &str, names: &[S]) -> bool {
    let path = normalize_separators(path);
    let mut segments: Vec<&str> = path.split('/').collect();
    segments.pop();

    segments.iter().any(|segment| {
        names
            .iter()
            .any(|name| segment.eq_ignore_ascii_case(name.as_ref()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stream_uri_detection() {
        assert!(is_stream_uri("phar://lib.phar/src/A.php"));
        assert!(is_stream_uri("vfs://root/A.php"));
        assert!(!is_stream_uri("C://Users/a.php"));
        assert!(!is_stream_uri("/var/www/A.php"));
        assert!(!is_stream_uri("1x://nope"));
    }

    #[test]
    fn test_collapse_slashes() {
        assert_eq!(collapse_slashes("phar://lib.phar//src///A.php"), "phar://lib.phar/src/A.php");
        assert_eq!(collapse_slashes("C:\\src\\\\A.php"), "C:/src/A.php");
        assert_eq!(collapse_slashes("/a//b"), "/a/b");
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension("/src/Foo.PHP"), Some("PHP"));
        assert_eq!(extension("/src/Foo.class.inc"), Some("inc"));
        assert_eq!(extension("/src.d/Foo"), None);
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("Foo/Bar.php"), "Foo/Bar");
        assert_eq!(strip_extension("a.d/Bar"), "a.d/Bar");
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(relative_to("/base/Foo/Bar.php", "/base"), Some("Foo/Bar.php"));
        assert_eq!(relative_to("/base/Foo/Bar.php", "/base/"), Some("Foo/Bar.php"));
        assert_eq!(relative_to("/basement/Bar.php", "/base"), None);
        assert_eq!(relative_to("/other/Bar.php", "/base"), None);
    }

    #[test]
    fn test_has_dir_segment() {
        let names = ["test", "tests", "fixture"];
        assert!(has_dir_segment("/src/Tests/A.php", &names));
        assert!(has_dir_segment("C:\\src\\fixture\\A.php", &names));
        assert!(!has_dir_segment("/src/testing/A.php", &names));
        assert!(!has_dir_segment("/src/Test.php", &names));
    }
}
