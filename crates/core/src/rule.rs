use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AffixMode {
    #[default]
    None,
    Add,
    Remove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionMode {
    #[default]
    None,
    Change,
}

impl FromStr for AffixMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(AffixMode::None),
            "add" => Ok(AffixMode::Add),
            "remove" => Ok(AffixMode::Remove),
            _ => Err(EngineError::InvalidMode {
                slot: "prefix/suffix",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for ExtensionMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(ExtensionMode::None),
            "change" => Ok(ExtensionMode::Change),
            _ => Err(EngineError::InvalidMode {
                slot: "extension",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for AffixMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AffixMode::None => "None",
            AffixMode::Add => "Add",
            AffixMode::Remove => "Remove",
        })
    }
}

impl fmt::Display for ExtensionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExtensionMode::None => "None",
            ExtensionMode::Change => "Change",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AffixRule {
    pub mode: AffixMode,
    pub value: String,
}

impl AffixRule {
    pub fn add(value: impl Into<String>) -> Self {
        Self {
            mode: AffixMode::Add,
            value: value.into(),
        }
    }

    pub fn remove(value: impl Into<String>) -> Self {
        Self {
            mode: AffixMode::Remove,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionRule {
    pub mode: ExtensionMode,
    pub value: String,
}

impl ExtensionRule {
    pub fn change(value: impl Into<String>) -> Self {
        Self {
            mode: ExtensionMode::Change,
            value: value.into(),
        }
    }
}

/// Prefix, suffix and extension transforms. Slots run in that order, each on
/// the output of the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameRule {
    pub prefix: AffixRule,
    pub suffix: AffixRule,
    pub extension: ExtensionRule,
}

impl RenameRule {
    pub fn apply(&self, name: &str) -> String {
        let name = apply_prefix(&self.prefix, name.to_string());
        let name = apply_suffix(&self.suffix, name);
        apply_extension(&self.extension, name)
    }

    pub fn is_noop(&self) -> bool {
        self.prefix.mode == AffixMode::None
            && self.suffix.mode == AffixMode::None
            && self.extension.mode == ExtensionMode::None
    }
}

/// Splits `name` at its final dot. The extension keeps the dot and is empty
/// when the name has none.
pub(crate) fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) => name.split_at(idx),
        None => (name, ""),
    }
}

fn apply_prefix(rule: &AffixRule, name: String) -> String {
    match rule.mode {
        AffixMode::None => name,
        AffixMode::Add => format!("{}{}", rule.value, name),
        AffixMode::Remove if name.starts_with(rule.value.as_str()) => {
            name[rule.value.len()..].to_string()
        }
        AffixMode::Remove => name,
    }
}

fn apply_suffix(rule: &AffixRule, name: String) -> String {
    let (base, ext) = split_extension(&name);
    let renamed = match rule.mode {
        AffixMode::None => None,
        AffixMode::Add => Some(format!("{}{}{}", base, rule.value, ext)),
        AffixMode::Remove => base
            .strip_suffix(rule.value.as_str())
            .map(|stripped| format!("{stripped}{ext}")),
    };
    renamed.unwrap_or(name)
}

fn apply_extension(rule: &ExtensionRule, name: String) -> String {
    if rule.mode != ExtensionMode::Change || rule.value.is_empty() {
        return name;
    }
    let replacement = if rule.value.starts_with('.') {
        rule.value.clone()
    } else {
        format!(".{}", rule.value)
    };
    let (base, _) = split_extension(&name);
    format!("{base}{replacement}")
}
