//! Field registry handle.
//!
//! Every annotation references a [`FieldId`] handed out by a
//! [`FieldRegistry`]. The registry is built once at start-up and passed by
//! reference into decode calls; the common PROFINET fields used by the
//! diagnostic emitters are registered by [`FieldRegistry::new`].

use serde::{Deserialize, Serialize};

/// Opaque index of a registered field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldId(usize);

impl FieldId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Storage type of a registered field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Uint8,
    Uint16,
    Uint24,
    Uint32,
    Int16,
    Int32,
    Ether,
    Ipv4,
    Guid,
    String,
    Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    /// Display name, e.g. "Padding".
    pub name: String,
    /// Filter abbreviation, e.g. "pn.padding".
    pub abbrev: String,
    pub kind: FieldKind,
}

/// Fields shared by every PROFINET dissector.
#[derive(Debug, Clone, Copy)]
pub struct CommonFields {
    pub padding: FieldId,
    pub undecoded: FieldId,
    pub user_data: FieldId,
    pub user_bytes: FieldId,
    pub frag_bytes: FieldId,
    pub malformed: FieldId,
}

#[derive(Debug, Clone)]
pub struct FieldRegistry {
    fields: Vec<FieldInfo>,
    common: CommonFields,
}

impl FieldRegistry {
    /// Create a registry with the common fields already registered.
    ///
    /// # Examples
    /// ```
    /// use pnfield_core::FieldRegistry;
    ///
    /// let registry = FieldRegistry::new();
    /// let padding = registry.common().padding;
    /// assert_eq!(registry.info(padding).unwrap().abbrev, "pn.padding");
    /// ```
    pub fn new() -> Self {
        let mut fields = Vec::new();
        let mut push = |name: &str, abbrev: &str, kind: FieldKind| {
            fields.push(FieldInfo {
                name: name.to_string(),
                abbrev: abbrev.to_string(),
                kind,
            });
            FieldId(fields.len() - 1)
        };
        let common = CommonFields {
            padding: push("Padding", "pn.padding", FieldKind::String),
            undecoded: push("Undecoded Data", "pn.undecoded", FieldKind::String),
            user_data: push("User Data", "pn.user_data", FieldKind::String),
            user_bytes: push("Substitute Data", "pn.user_bytes", FieldKind::Bytes),
            frag_bytes: push("Fragment Data", "pn.frag_bytes", FieldKind::Bytes),
            malformed: push("Malformed", "pn_rt.malformed", FieldKind::Bytes),
        };
        Self { fields, common }
    }

    /// Register a dissector-specific field. Re-registering an abbreviation
    /// returns the existing id.
    pub fn register(&mut self, name: &str, abbrev: &str, kind: FieldKind) -> FieldId {
        if let Some(id) = self.find(abbrev) {
            return id;
        }
        self.fields.push(FieldInfo {
            name: name.to_string(),
            abbrev: abbrev.to_string(),
            kind,
        });
        FieldId(self.fields.len() - 1)
    }

    pub fn info(&self, id: FieldId) -> Option<&FieldInfo> {
        self.fields.get(id.0)
    }

    pub fn find(&self, abbrev: &str) -> Option<FieldId> {
        self.fields
            .iter()
            .position(|info| info.abbrev == abbrev)
            .map(FieldId)
    }

    pub fn common(&self) -> &CommonFields {
        &self.common
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldKind, FieldRegistry};

    #[test]
    fn common_fields_are_distinct() {
        let registry = FieldRegistry::new();
        let common = registry.common();
        let mut ids = vec![
            common.padding,
            common.undecoded,
            common.user_data,
            common.user_bytes,
            common.frag_bytes,
            common.malformed,
        ];
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 6);
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn register_is_idempotent_per_abbrev() {
        let mut registry = FieldRegistry::new();
        let first = registry.register("Frame ID", "pn.frame_id", FieldKind::Uint16);
        let second = registry.register("Frame ID again", "pn.frame_id", FieldKind::Uint16);
        assert_eq!(first, second);
        assert_eq!(registry.info(first).unwrap().name, "Frame ID");
    }
}
