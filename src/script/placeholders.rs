//! Substitution variables
//!
//! Placeholders are written either wrapped in percent signs (`%lbixname%`)
//! or as a bare word (`lbixname`). Replacement is a single left-to-right
//! pass; substituted text is never rescanned.

use std::collections::BTreeMap;

/// Text entered in the last text box
pub const TXTBOXINPUT: &str = "txtboxinput";
/// Base name of the open container
pub const LBIXNAME: &str = "lbixname";
/// Path chosen in the last file picker
pub const FILEPICKED: &str = "filepicked";

/// Named interpreter values available for substitution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variables {
    values: BTreeMap<String, String>,
}

impl Variables {
    /// Fresh variables for a container with the given base name
    pub fn new(lbix_name: &str) -> Self {
        let mut values = BTreeMap::new();
        values.insert(TXTBOXINPUT.to_string(), String::new());
        values.insert(LBIXNAME.to_string(), lbix_name.to_string());
        values.insert(FILEPICKED.to_string(), String::new());
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replace every placeholder in `text` with its current value
    pub fn substitute(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        'scan: while let Some(c) = rest.chars().next() {
            let prev_is_word = out.chars().next_back().is_some_and(is_word_char);

            for (name, value) in &self.values {
                if let Some(after) = rest
                    .strip_prefix('%')
                    .and_then(|r| r.strip_prefix(name.as_str()))
                    .and_then(|r| r.strip_prefix('%'))
                {
                    out.push_str(value);
                    rest = after;
                    continue 'scan;
                }

                if !prev_is_word {
                    if let Some(after) = rest.strip_prefix(name.as_str()) {
                        if !after.chars().next().is_some_and(is_word_char) {
                            out.push_str(value);
                            rest = after;
                            continue 'scan;
                        }
                    }
                }
            }

            out.push(c);
            rest = &rest[c.len_utf8()..];
        }

        out
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> Variables {
        let mut vars = Variables::new("holiday.lbix");
        vars.set(TXTBOXINPUT, "Ada");
        vars.set(FILEPICKED, "/tmp/notes.txt");
        vars
    }

    #[test]
    fn test_bare_and_percent_forms() {
        let vars = vars();
        assert_eq!(vars.substitute("hello txtboxinput"), "hello Ada");
        assert_eq!(vars.substitute("hello %txtboxinput%!"), "hello Ada!");
        assert_eq!(
            vars.substitute("%lbixname% -> filepicked"),
            "holiday.lbix -> /tmp/notes.txt"
        );
    }

    #[test]
    fn test_word_boundaries() {
        let vars = vars();
        assert_eq!(vars.substitute("mytxtboxinput"), "mytxtboxinput");
        assert_eq!(vars.substitute("txtboxinputs"), "txtboxinputs");
        assert_eq!(vars.substitute("(txtboxinput)"), "(Ada)");
    }

    #[test]
    fn test_single_pass() {
        let mut vars = Variables::new("x");
        vars.set(TXTBOXINPUT, "%lbixname% and lbixname");
        assert_eq!(
            vars.substitute("txtboxinput"),
            "%lbixname% and lbixname"
        );
    }

    #[test]
    fn test_unicode_passthrough() {
        let vars = vars();
        assert_eq!(vars.substitute("héllo txtboxinput ✓"), "héllo Ada ✓");
    }

    #[test]
    fn test_defaults() {
        let vars = Variables::new("a.lbix");
        assert_eq!(vars.get(TXTBOXINPUT), Some(""));
        assert_eq!(vars.get(LBIXNAME), Some("a.lbix"));
        assert_eq!(vars.get(FILEPICKED), Some(""));
        assert_eq!(vars.iter().count(), 3);
    }
}
