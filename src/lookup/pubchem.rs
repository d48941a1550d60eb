use backon::ExponentialBuilder;
use clinica_schema::{PubChemFaultBody, PubChemPropertyResponse};
use serde::Serialize;
use url::Url;

use super::upstream_retry::get_json_with_retry;
use crate::error::LookupError;

const PROPERTIES: &str = "MolecularFormula,MolecularWeight,IUPACName,CanonicalSMILES";

/// Display data for a compound found on PubChem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompoundInfo {
    pub query: String,
    pub cid: u64,
    pub molecular_formula: Option<String>,
    pub molecular_weight: Option<String>,
    pub iupac_name: Option<String>,
    pub canonical_smiles: Option<String>,
    /// 2D structure depiction served by PubChem.
    pub image_url: Url,
}

#[derive(Clone)]
pub struct PubChemClient {
    client: reqwest::Client,
    base: Url,
    retry_policy: ExponentialBuilder,
}

impl PubChemClient {
    pub fn new(client: reqwest::Client, base: Url, retry_policy: ExponentialBuilder) -> Self {
        Self {
            client,
            base,
            retry_policy,
        }
    }

    /// First compound matching `name`, or `None` when PubChem knows no such name.
    pub async fn compound_by_name(&self, name: &str) -> Result<Option<CompoundInfo>, LookupError> {
        let url = self.endpoint(&["compound", "name", name, "property", PROPERTIES, "JSON"])?;
        let resp: Option<PubChemPropertyResponse> =
            get_json_with_retry(
                "pubchem",
                &self.client,
                &url,
                self.retry_policy,
                is_unknown_name,
            )
            .await?;

        let Some(props) = resp.as_ref().and_then(PubChemPropertyResponse::first) else {
            return Ok(None);
        };

        Ok(Some(CompoundInfo {
            query: name.to_string(),
            cid: props.cid,
            molecular_formula: props.molecular_formula.clone(),
            molecular_weight: props.molecular_weight.clone(),
            iupac_name: props.iupac_name.clone(),
            canonical_smiles: props.canonical_smiles.clone(),
            image_url: self.structure_image_url(props.cid)?,
        }))
    }

    pub fn structure_image_url(&self, cid: u64) -> Result<Url, LookupError> {
        self.endpoint(&["compound", "cid", &cid.to_string(), "PNG"])
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, LookupError> {
        push_segments(&self.base, segments)
    }
}

/// PUG REST answers an unknown name with a `404` carrying a `PUGREST.NotFound` fault.
/// A `404` without it means the request itself was wrong (e.g. a bad base URL).
fn is_unknown_name(body: &[u8]) -> bool {
    serde_json::from_slice::<PubChemFaultBody>(body).is_ok_and(|b| b.fault.is_not_found())
}

/// Appends percent-encoded path segments to a base URL ending in `/`.
pub(super) fn push_segments(base: &Url, segments: &[&str]) -> Result<Url, LookupError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| LookupError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
