//! PubChem PUG REST payloads.
//!
//! Only the `property` endpoint is modelled. Field names follow PubChem's
//! PascalCase JSON; everything except the CID is optional because PubChem
//! omits properties it cannot compute for a compound.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Response of `compound/name/{name}/property/{props}/JSON`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PubChemPropertyResponse {
    #[serde(rename = "PropertyTable")]
    pub property_table: PropertyTable,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PropertyTable {
    #[serde(rename = "Properties", default)]
    pub properties: Vec<CompoundProperties>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct CompoundProperties {
    #[serde(rename = "CID")]
    pub cid: u64,

    #[serde(default)]
    pub molecular_formula: Option<String>,

    /// PubChem has served this both as a JSON number and as a string.
    #[serde(default, deserialize_with = "deserialize_lax_string")]
    pub molecular_weight: Option<String>,

    #[serde(rename = "IUPACName", default)]
    pub iupac_name: Option<String>,

    /// Newer PubChem releases answer `CanonicalSMILES` requests with `ConnectivitySMILES`.
    #[serde(rename = "CanonicalSMILES", alias = "ConnectivitySMILES", default)]
    pub canonical_smiles: Option<String>,
}

impl PubChemPropertyResponse {
    pub fn first(&self) -> Option<&CompoundProperties> {
        self.property_table.properties.first()
    }
}

/// Error envelope returned by PUG REST, e.g. `{"Fault":{"Code":"PUGREST.NotFound",...}}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PubChemFaultBody {
    #[serde(rename = "Fault")]
    pub fault: PubChemFault,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PubChemFault {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub details: Vec<String>,
}

impl PubChemFault {
    pub fn is_not_found(&self) -> bool {
        self.code == "PUGREST.NotFound"
    }
}

fn deserialize_lax_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;

    match v {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(serde::de::Error::custom(
            "expected a string or a number for MolecularWeight",
        )),
    }
}
