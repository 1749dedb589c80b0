//! Property bags and their loading.
//!
//! A [`PropertyBag`] is the raw, untyped input to resolution. Bags are
//! usually read from a `.properties` file and then patched with
//! `key=value` overrides from the command line.
//!
//! Properties file resolution order:
//! 1. Explicit CLI path
//! 2. `C2G_PROPERTIES` environment variable
//! 3. XDG config directory (`~/.config/cassandra-to-gcs/job.properties`)
//! 4. None (empty bag; overrides only)

use std::collections::BTreeMap;
use std::iter::Peekable;
use std::path::{Path, PathBuf};
use std::str::Chars;

use c2g_common::{Error, Result};
use serde::Serialize;

/// Environment variable naming a properties file.
pub const ENV_PROPERTIES_PATH: &str = "C2G_PROPERTIES";

/// Standard properties file name.
const PROPERTIES_FILENAME: &str = "job.properties";

/// Application name for XDG directories.
const APP_NAME: &str = "cassandra-to-gcs";

/// String-keyed, string-valued settings. Iteration is in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PropertyBag {
    entries: BTreeMap<String, String>,
}

impl PropertyBag {
    pub fn new() -> Self {
        PropertyBag::default()
    }

    /// Insert or replace a value, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Apply every entry of `other`, replacing existing values.
    pub fn merge(&mut self, other: PropertyBag) {
        self.entries.extend(other.entries);
    }

    /// Parse `.properties` text.
    ///
    /// Supported syntax: `#`/`!` comment lines, `=`, `:` or whitespace as
    /// the key/value separator, backslash line continuations, and the
    /// `\t \n \r \f \uXXXX` escapes. Lines end at `\n`, `\r\n` or a lone
    /// `\r`. Duplicate keys keep the last value.
    pub fn parse(text: &str) -> Self {
        let mut bag = PropertyBag::new();
        let mut logical = String::new();
        let mut continuing = false;

        let text = text.replace("\r\n", "\n");
        for line in text.split(['\n', '\r']) {
            let line = line.trim_start();
            if !continuing {
                if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                    continue;
                }
                logical.clear();
            }

            continuing = ends_with_continuation(line);
            if continuing {
                logical.push_str(&line[..line.len() - 1]);
                continue;
            }
            logical.push_str(line);

            let (key, value) = parse_logical_line(&logical);
            bag.insert(key, value);
        }

        if continuing && !logical.is_empty() {
            let (key, value) = parse_logical_line(&logical);
            bag.insert(key, value);
        }

        bag
    }

    /// Read and parse a properties file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::InvalidData {
                Error::InvalidProperties {
                    path: path.display().to_string(),
                    message: "file is not valid UTF-8".to_string(),
                }
            } else {
                Error::Read {
                    path: path.display().to_string(),
                    source: e,
                }
            }
        })?;

        let bag = PropertyBag::parse(&content);
        tracing::debug!(
            path = %path.display(),
            entries = bag.len(),
            "loaded properties file"
        );
        Ok(bag)
    }

    /// Apply `key=value` overrides in order.
    pub fn apply_overrides<S: AsRef<str>>(&mut self, overrides: &[S]) -> Result<()> {
        for raw in overrides {
            let (key, value) = parse_override(raw.as_ref())?;
            if let Some(previous) = self.insert(key.clone(), value) {
                tracing::debug!(key = %key, previous = %previous, "property overridden");
            }
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        PropertyBag {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<std::collections::HashMap<String, String>> for PropertyBag {
    fn from(map: std::collections::HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<BTreeMap<String, String>> for PropertyBag {
    fn from(entries: BTreeMap<String, String>) -> Self {
        PropertyBag { entries }
    }
}

/// Split a `key=value` override. The value may be empty; the key may not.
pub fn parse_override(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(Error::InvalidOverride(raw.to_string())),
    }
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn parse_logical_line(line: &str) -> (String, String) {
    let mut chars = line.chars().peekable();
    let mut key = String::new();

    while let Some(c) = chars.next() {
        match c {
            '\\' => push_escaped(&mut key, &mut chars),
            '=' | ':' => break,
            c if c.is_whitespace() => {
                skip_whitespace(&mut chars);
                if matches!(chars.peek(), Some('=') | Some(':')) {
                    chars.next();
                }
                break;
            }
            c => key.push(c),
        }
    }

    skip_whitespace(&mut chars);
    let mut value = String::new();
    while let Some(c) = chars.next() {
        if c == '\\' {
            push_escaped(&mut value, &mut chars);
        } else {
            value.push(c);
        }
    }

    (key, value)
}

fn skip_whitespace(chars: &mut Peekable<Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}

fn push_escaped(out: &mut String, chars: &mut Peekable<Chars<'_>>) {
    match chars.next() {
        Some('t') => out.push('\t'),
        Some('n') => out.push('\n'),
        Some('r') => out.push('\r'),
        Some('f') => out.push('\x0c'),
        Some('u') => {
            let hex: String = chars.by_ref().take(4).collect();
            match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                Some(c) if hex.len() == 4 => out.push(c),
                _ => {
                    out.push_str("\\u");
                    out.push_str(&hex);
                }
            }
        }
        Some(other) => out.push(other),
        None => {}
    }
}

/// Where the properties file was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertiesSource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// No file; overrides only.
    #[default]
    None,
}

impl std::fmt::Display for PropertiesSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertiesSource::CliArgument => write!(f, "CLI argument"),
            PropertiesSource::Environment => write!(f, "environment variable"),
            PropertiesSource::XdgConfig => write!(f, "XDG config"),
            PropertiesSource::None => write!(f, "none"),
        }
    }
}

/// Discovered properties file location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertiesPaths {
    pub path: Option<PathBuf>,
    pub source: PropertiesSource,
}

/// Locate the properties file using the standard resolution order.
///
/// An explicit CLI path or environment path is returned even if it does not
/// exist, so that reading it reports the error. The XDG location is only
/// used when the file is present.
pub fn resolve_properties_path(cli_path: Option<&Path>) -> PropertiesPaths {
    if let Some(path) = cli_path {
        return PropertiesPaths {
            path: Some(path.to_path_buf()),
            source: PropertiesSource::CliArgument,
        };
    }

    if let Ok(env_path) = std::env::var(ENV_PROPERTIES_PATH) {
        if !env_path.is_empty() {
            return PropertiesPaths {
                path: Some(PathBuf::from(env_path)),
                source: PropertiesSource::Environment,
            };
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(PROPERTIES_FILENAME);
        if path.is_file() {
            return PropertiesPaths {
                path: Some(path),
                source: PropertiesSource::XdgConfig,
            };
        }
    }

    PropertiesPaths::default()
}

/// Get the XDG config directory for this tool.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Resolve the properties file, read it, and apply `overrides` on top.
pub fn load_properties<S: AsRef<str>>(
    cli_path: Option<&Path>,
    overrides: &[S],
) -> Result<(PropertyBag, PropertiesPaths)> {
    let paths = resolve_properties_path(cli_path);
    tracing::debug!(source = %paths.source, "resolved properties source");

    let mut bag = match &paths.path {
        Some(path) => PropertyBag::from_file(path)?,
        None => PropertyBag::new(),
    };
    bag.apply_overrides(overrides)?;

    Ok((bag, paths))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_separators() {
        let bag = PropertyBag::parse(
            "a=1\n\
             b: 2\n\
             c 3\n\
             d = spaced value  \n",
        );
        assert_eq!(bag.get("a"), Some("1"));
        assert_eq!(bag.get("b"), Some("2"));
        assert_eq!(bag.get("c"), Some("3"));
        // Trailing whitespace is part of the value.
        assert_eq!(bag.get("d"), Some("spaced value  "));
    }

    #[test]
    fn test_parse_comments_and_blank_lines() {
        let bag = PropertyBag::parse("# comment\n! also comment\n\n   \nkey=value\n");
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.get("key"), Some("value"));
    }

    #[test]
    fn test_parse_value_keeps_later_separators() {
        let bag = PropertyBag::parse("cassandratogcs.output.path=gs://bucket/a=b:c\n");
        assert_eq!(bag.get("cassandratogcs.output.path"), Some("gs://bucket/a=b:c"));
    }

    #[test]
    fn test_parse_continuation() {
        let bag = PropertyBag::parse("q=SELECT * \\\n    FROM t1 \\\n    WHERE x = 1\nnext=2\n");
        assert_eq!(bag.get("q"), Some("SELECT * FROM t1 WHERE x = 1"));
        assert_eq!(bag.get("next"), Some("2"));
    }

    #[test]
    fn test_parse_line_terminators() {
        let bag = PropertyBag::parse("a=1\rb=2\r\nc=3\r");
        assert_eq!(bag.len(), 3);
        assert_eq!(bag.get("a"), Some("1"));
        assert_eq!(bag.get("b"), Some("2"));
        assert_eq!(bag.get("c"), Some("3"));

        let bag = PropertyBag::parse("q=SELECT * \\\r    FROM t1\rnext=2");
        assert_eq!(bag.get("q"), Some("SELECT * FROM t1"));
        assert_eq!(bag.get("next"), Some("2"));
    }

    #[test]
    fn test_parse_continuation_at_eof() {
        let bag = PropertyBag::parse("q=a\\");
        assert_eq!(bag.get("q"), Some("a"));
    }

    #[test]
    fn test_parse_escapes() {
        let bag = PropertyBag::parse("my\\=key=tab\\there\nu=\\u0041B\nlit=back\\\\slash\n");
        assert_eq!(bag.get("my=key"), Some("tab\there"));
        assert_eq!(bag.get("u"), Some("AB"));
        assert_eq!(bag.get("lit"), Some("back\\slash"));
    }

    #[test]
    fn test_parse_key_without_value() {
        let bag = PropertyBag::parse("lonely\n");
        assert_eq!(bag.get("lonely"), Some(""));
    }

    #[test]
    fn test_parse_duplicate_keeps_last() {
        let bag = PropertyBag::parse("k=1\nk=2\n");
        assert_eq!(bag.get("k"), Some("2"));
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("a.b=c=d").unwrap(),
            ("a.b".to_string(), "c=d".to_string())
        );
        assert_eq!(parse_override("a=").unwrap(), ("a".to_string(), String::new()));
        assert!(matches!(parse_override("novalue"), Err(Error::InvalidOverride(_))));
        assert!(matches!(parse_override("=x"), Err(Error::InvalidOverride(_))));
    }

    #[test]
    fn test_merge_later_wins() {
        let mut base = PropertyBag::from_iter([("a", "1"), ("b", "2")]);
        base.merge(PropertyBag::from_iter([("b", "3"), ("c", "4")]));
        assert_eq!(base.get("a"), Some("1"));
        assert_eq!(base.get("b"), Some("3"));
        assert_eq!(base.get("c"), Some("4"));
    }

    #[test]
    fn test_apply_overrides() {
        let mut bag = PropertyBag::from_iter([("a", "1")]);
        bag.apply_overrides(&["a=2", "b=3"]).unwrap();
        assert_eq!(bag.get("a"), Some("2"));
        assert_eq!(bag.get("b"), Some("3"));
        assert!(bag.apply_overrides(&["bad"]).is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let err = PropertyBag::from_file(Path::new("/nonexistent/job.properties")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }

    #[test]
    fn test_from_file_not_utf8() {
        use std::io::Write;

        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&[b'k', b'=', 0xff, 0xfe]).unwrap();
        let err = PropertyBag::from_file(tmp.path()).unwrap_err();
        assert!(matches!(err, Error::InvalidProperties { .. }));
    }

    #[test]
    fn test_cli_path_wins() {
        let paths = resolve_properties_path(Some(Path::new("/tmp/explicit.properties")));
        assert_eq!(paths.source, PropertiesSource::CliArgument);
        assert_eq!(paths.path, Some(PathBuf::from("/tmp/explicit.properties")));
    }

    #[test]
    fn test_properties_source_display() {
        assert_eq!(PropertiesSource::CliArgument.to_string(), "CLI argument");
        assert_eq!(PropertiesSource::Environment.to_string(), "environment variable");
        assert_eq!(PropertiesSource::XdgConfig.to_string(), "XDG config");
        assert_eq!(PropertiesSource::None.to_string(), "none");
    }
}
