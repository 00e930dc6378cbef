//! Entity identity system using type-prefixed ULIDs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use ulid::Ulid;

/// Entity type prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityPrefix {
    /// User account
    Usr,
    /// Site (facility)
    Site,
    /// Location within a site
    Loc,
    /// Service desk ticket
    Tkt,
    /// Comment on a ticket, work order, RFQ or PO
    Cmt,
    /// Activity log event
    Act,
    /// File attachment
    Att,
    /// Physical asset
    Ast,
    /// Work order
    Wo,
    /// Preventive maintenance plan
    Pm,
    /// Supplier
    Sup,
    /// Request for quotation
    Rfq,
    /// Supplier quote
    Quot,
    /// Purchase order
    Po,
    /// Notification
    Ntf,
    /// Line item inside a quote, PO, checklist or parts list
    Item,
}

impl EntityPrefix {
    /// Get the string representation of the prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::Usr => "USR",
            EntityPrefix::Site => "SITE",
            EntityPrefix::Loc => "LOC",
            EntityPrefix::Tkt => "TKT",
            EntityPrefix::Cmt => "CMT",
            EntityPrefix::Act => "ACT",
            EntityPrefix::Att => "ATT",
            EntityPrefix::Ast => "AST",
            EntityPrefix::Wo => "WO",
            EntityPrefix::Pm => "PM",
            EntityPrefix::Sup => "SUP",
            EntityPrefix::Rfq => "RFQ",
            EntityPrefix::Quot => "QUOT",
            EntityPrefix::Po => "PO",
            EntityPrefix::Ntf => "NTF",
            EntityPrefix::Item => "ITEM",
        }
    }

    /// Get all valid prefixes
    pub fn all() -> &'static [EntityPrefix] {
        &[
            EntityPrefix::Usr,
            EntityPrefix::Site,
            EntityPrefix::Loc,
            EntityPrefix::Tkt,
            EntityPrefix::Cmt,
            EntityPrefix::Act,
            EntityPrefix::Att,
            EntityPrefix::Ast,
            EntityPrefix::Wo,
            EntityPrefix::Pm,
            EntityPrefix::Sup,
            EntityPrefix::Rfq,
            EntityPrefix::Quot,
            EntityPrefix::Po,
            EntityPrefix::Ntf,
            EntityPrefix::Item,
        ]
    }
}

impl fmt::Display for EntityPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityPrefix {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USR" => Ok(EntityPrefix::Usr),
            "SITE" => Ok(EntityPrefix::Site),
            "LOC" => Ok(EntityPrefix::Loc),
            "TKT" => Ok(EntityPrefix::Tkt),
            "CMT" => Ok(EntityPrefix::Cmt),
            "ACT" => Ok(EntityPrefix::Act),
            "ATT" => Ok(EntityPrefix::Att),
            "AST" => Ok(EntityPrefix::Ast),
            "WO" => Ok(EntityPrefix::Wo),
            "PM" => Ok(EntityPrefix::Pm),
            "SUP" => Ok(EntityPrefix::Sup),
            "RFQ" => Ok(EntityPrefix::Rfq),
            "QUOT" => Ok(EntityPrefix::Quot),
            "PO" => Ok(EntityPrefix::Po),
            "NTF" => Ok(EntityPrefix::Ntf),
            "ITEM" => Ok(EntityPrefix::Item),
            _ => Err(IdParseError::InvalidPrefix(s.to_string())),
        }
    }
}

/// A unique entity identifier
///
/// Identifiers are minted by whoever constructs the entity (CLI flows, the
/// demo seed) as a type prefix plus ULID. The store never generates them.
/// Ids read back from a snapshot are opaque: any non-empty string is kept
/// verbatim, so data written by other tools (uuids, say) survives a load.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityId(String);

impl EntityId {
    /// Create a new EntityId with the given prefix
    pub fn new(prefix: EntityPrefix) -> Self {
        Self::from_parts(prefix, Ulid::new())
    }

    /// Create an EntityId from a prefix and existing ULID
    pub fn from_parts(prefix: EntityPrefix, ulid: Ulid) -> Self {
        Self(format!("{}-{}", prefix, ulid))
    }

    /// Get the entity prefix, if this id has the minted `PREFIX-ULID` form
    pub fn prefix(&self) -> Option<EntityPrefix> {
        Self::split(&self.0).ok().map(|(prefix, _)| prefix)
    }

    /// Get the ULID component, if this id has the minted `PREFIX-ULID` form
    pub fn ulid(&self) -> Option<Ulid> {
        Self::split(&self.0).ok().map(|(_, ulid)| ulid)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse an EntityId in the minted `PREFIX-ULID` form
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }

    fn split(s: &str) -> Result<(EntityPrefix, Ulid), IdParseError> {
        let (prefix_str, ulid_str) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingDelimiter(s.to_string()))?;

        let prefix = prefix_str.parse()?;
        let ulid = Ulid::from_string(ulid_str)
            .map_err(|e| IdParseError::InvalidUlid(ulid_str.to_string(), e.to_string()))?;

        Ok((prefix, ulid))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (prefix, ulid) = Self::split(s)?;
        Ok(Self::from_parts(prefix, ulid))
    }
}

impl Serialize for EntityId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.trim().is_empty() {
            return Err(serde::de::Error::custom(IdParseError::Empty));
        }
        Ok(Self(s))
    }
}

/// Errors that can occur when parsing entity IDs
#[derive(Debug, Error)]
pub enum IdParseError {
    #[error("invalid entity prefix: '{0}' (valid: USR, SITE, LOC, TKT, CMT, ACT, ATT, AST, WO, PM, SUP, RFQ, QUOT, PO, NTF, ITEM)")]
    InvalidPrefix(String),

    #[error("missing '-' delimiter in entity ID: '{0}'")]
    MissingDelimiter(String),

    #[error("invalid ULID '{0}': {1}")]
    InvalidUlid(String, String),

    #[error("entity ID must not be empty")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_generation() {
        let id = EntityId::new(EntityPrefix::Tkt);
        assert!(id.to_string().starts_with("TKT-"));
        assert_eq!(id.to_string().len(), 30); // TKT- (4) + ULID (26) = 30
    }

    #[test]
    fn test_entity_id_parsing() {
        let original = EntityId::new(EntityPrefix::Wo);
        let parsed = EntityId::parse(&original.to_string()).unwrap();
        assert_eq!(parsed.prefix(), Some(EntityPrefix::Wo));
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_entity_id_invalid_prefix() {
        let err = EntityId::parse("XXX-01HQ3K4N5M6P7R8S9T0UVWXYZ").unwrap_err();
        assert!(matches!(err, IdParseError::InvalidPrefix(_)));
    }

    #[test]
    fn test_entity_id_missing_delimiter() {
        let err = EntityId::parse("TKT01HQ3K4N5M6P7R8S9T0UVWXYZ").unwrap_err();
        assert!(matches!(err, IdParseError::MissingDelimiter(_)));
    }

    #[test]
    fn test_entity_id_invalid_ulid() {
        let err = EntityId::parse("AST-notaulid").unwrap_err();
        assert!(matches!(err, IdParseError::InvalidUlid(_, _)));
    }

    #[test]
    fn test_entity_id_serializes_as_string() {
        let id = EntityId::new(EntityPrefix::Po);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_all_prefixes_parse() {
        for prefix in EntityPrefix::all() {
            let id = EntityId::new(*prefix);
            let parsed = EntityId::parse(&id.to_string()).unwrap();
            assert_eq!(parsed.prefix(), Some(*prefix));
        }
    }

    #[test]
    fn test_deserialize_keeps_foreign_ids_verbatim() {
        let raw = "3f2b9c1e-8d4a-4b7e-9a51-2c6f0d7e8a90";
        let id: EntityId = serde_json::from_str(&format!("\"{}\"", raw)).unwrap();
        assert_eq!(id.as_str(), raw);
        assert_eq!(id.prefix(), None);
        assert_eq!(serde_json::to_string(&id).unwrap(), format!("\"{}\"", raw));

        // The strict form is still required when parsing a minted id
        assert!(EntityId::parse(raw).is_err());
    }

    #[test]
    fn test_deserialize_rejects_empty_id() {
        assert!(serde_json::from_str::<EntityId>("\"\"").is_err());
        assert!(serde_json::from_str::<EntityId>("\"  \"").is_err());
    }
}
