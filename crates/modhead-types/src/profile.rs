//! User-defined profiles and the ordered list that holds them
//!
//! A [`Profile`] says "for requests whose URL matches `url_regex`, inject
//! these headers". The position of a profile inside its [`ProfileList`] is
//! the only source of precedence: earlier profiles win.

use crate::error::{ProfileError, Result};
use crate::ids::{HeaderId, ProfileId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Pattern the editor pre-fills for a new profile
pub const DEFAULT_URL_REGEX: &str = "^https?://.*";

/// A single header to inject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub id: HeaderId,
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: HeaderId::generate(),
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<HeaderId>) -> Self {
        self.id = id.into();
        self
    }

    /// Both name and value are present.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.value.is_empty()
    }
}

/// A named URL pattern with headers to inject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub url_regex: String,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Profile {
    /// Create an enabled profile with a fresh id and no headers
    pub fn new(name: impl Into<String>, url_regex: impl Into<String>) -> Self {
        Self {
            id: ProfileId::generate(),
            name: name.into(),
            url_regex: url_regex.into(),
            headers: Vec::new(),
            enabled: true,
        }
    }

    pub fn with_id(mut self, id: impl Into<ProfileId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(name, value));
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Headers that have both a name and a value, in their original order.
    pub fn complete_headers(&self) -> impl Iterator<Item = &Header> {
        self.headers.iter().filter(|h| h.is_complete())
    }

    /// Check the profile the way the editor does before saving.
    ///
    /// Incomplete headers are not an error here; [`Profile::sanitized`] drops
    /// them. A profile must however keep at least one complete header.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::NameRequired);
        }
        validate_url_regex(&self.url_regex)?;
        if self.complete_headers().next().is_none() {
            return Err(ProfileError::NoHeaders);
        }
        Ok(())
    }

    /// Copy of the profile with incomplete header rows removed.
    pub fn sanitized(&self) -> Self {
        Self {
            headers: self.complete_headers().cloned().collect(),
            ..self.clone()
        }
    }
}

/// Check that a URL pattern is present and parses.
///
/// Patterns are checked with RE2-style syntax, the dialect request rule
/// engines evaluate `regexFilter` with.
pub fn validate_url_regex(pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        return Err(ProfileError::UrlRegexRequired);
    }
    regex::Regex::new(pattern).map_err(|e| ProfileError::InvalidUrlRegex {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    Ok(())
}

/// Editor form contents before they become a [`Profile`].
///
/// Mirrors the edit form: the id is absent for new profiles and header rows
/// may be blank or half-filled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    #[serde(default)]
    pub id: Option<ProfileId>,
    pub name: String,
    #[serde(default)]
    pub url_regex: Option<String>,
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

impl ProfileDraft {
    /// Validate the form and turn it into a storable profile.
    ///
    /// Rows missing a name or a value are dropped; new profiles get a
    /// generated id and start enabled.
    pub fn into_profile(self) -> Result<Profile> {
        let profile = Profile {
            id: self.id.unwrap_or_else(ProfileId::generate),
            name: self.name,
            url_regex: self
                .url_regex
                .unwrap_or_else(|| DEFAULT_URL_REGEX.to_string()),
            headers: self
                .headers
                .into_iter()
                .map(|(name, value)| Header::new(name, value))
                .filter(Header::is_complete)
                .collect(),
            enabled: self.enabled.unwrap_or(true),
        };
        profile.validate()?;
        Ok(profile)
    }
}

/// An edit applied to a [`ProfileList`] by the list and editor views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ProfileEdit {
    /// Replace the profile with the same id, or append it
    Upsert(Profile),
    /// Remove a profile
    Delete { id: ProfileId },
    /// Toggle a profile on or off
    SetEnabled { id: ProfileId, enabled: bool },
    /// Move a profile to a new position, changing its precedence
    Move { id: ProfileId, to: usize },
}

/// Ordered list of profiles; order decides precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileList(Vec<Profile>);

impl ProfileList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Profile> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Profile] {
        &self.0
    }

    pub fn get(&self, id: &ProfileId) -> Option<&Profile> {
        self.0.iter().find(|p| &p.id == id)
    }

    pub fn position(&self, id: &ProfileId) -> Option<usize> {
        self.0.iter().position(|p| &p.id == id)
    }

    pub fn push(&mut self, profile: Profile) {
        self.0.push(profile);
    }

    /// Fail on the first id that appears twice.
    pub fn check_unique_ids(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.0.len());
        for profile in &self.0 {
            if !seen.insert(&profile.id) {
                return Err(ProfileError::DuplicateId(profile.id.clone()));
            }
        }
        Ok(())
    }

    /// Apply one edit in place.
    ///
    /// The list is left unchanged when the edit fails.
    pub fn apply(&mut self, edit: ProfileEdit) -> Result<()> {
        match edit {
            ProfileEdit::Upsert(profile) => match self.position(&profile.id) {
                Some(index) => self.0[index] = profile,
                None => self.0.push(profile),
            },
            ProfileEdit::Delete { id } => {
                let index = self.require(&id)?;
                self.0.remove(index);
            }
            ProfileEdit::SetEnabled { id, enabled } => {
                let index = self.require(&id)?;
                self.0[index].enabled = enabled;
            }
            ProfileEdit::Move { id, to } => {
                let index = self.require(&id)?;
                if to >= self.0.len() {
                    return Err(ProfileError::IndexOutOfRange {
                        index: to,
                        len: self.0.len(),
                    });
                }
                let profile = self.0.remove(index);
                self.0.insert(to, profile);
            }
        }
        Ok(())
    }

    fn require(&self, id: &ProfileId) -> Result<usize> {
        self.position(id)
            .ok_or_else(|| ProfileError::ProfileNotFound(id.clone()))
    }
}

impl From<Vec<Profile>> for ProfileList {
    fn from(profiles: Vec<Profile>) -> Self {
        Self(profiles)
    }
}

impl FromIterator<Profile> for ProfileList {
    fn from_iter<I: IntoIterator<Item = Profile>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ProfileList {
    type Item = Profile;
    type IntoIter = std::vec::IntoIter<Profile>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ProfileList {
    type Item = &'a Profile;
    type IntoIter = std::slice::Iter<'a, Profile>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
