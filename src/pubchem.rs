//! PubChem PUG REST lookup adapter
//!
//! Resolving a compound takes two sequential calls: a name search that
//! yields a CID, then a property fetch for that CID. Any failure or empty
//! result set is surfaced to the caller; unlike the analysis chain, no
//! fallback data is substituted here.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const PUBCHEM_BASE_URL: &str = "https://pubchem.ncbi.nlm.nih.gov";
const MOLVIEW_BASE_URL: &str = "https://molview.org";
const CHEMSPIDER_BASE_URL: &str = "https://www.chemspider.com";

/// Errors from the compound database
#[derive(Error, Debug)]
pub enum PubChemError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("PubChem returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("no compound matched \"{0}\"")]
    NotFound(String),
}

/// Properties resolved for a compound
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompoundRecord {
    pub cid: u32,
    pub molecular_formula: String,
    /// Absent when PubChem omits the weight or reports an unparseable value
    pub molecular_weight: Option<f64>,
    pub canonical_smiles: String,
    pub iupac_name: String,
}

/// Client for the PubChem PUG REST service
pub struct PubChemClient {
    client: Client,
    base_url: String,
}

impl Default for PubChemClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PubChemClient {
    /// Create a client against the public PubChem endpoint
    pub fn new() -> Self {
        Self::with_base_url(PUBCHEM_BASE_URL)
    }

    /// Create with a custom base URL (useful for tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("Failed to create HTTP client"),
            base_url,
        }
    }

    /// Resolve a compound name to its properties. Two sequential calls;
    /// the second only runs when the first yields a CID.
    pub async fn lookup(&self, name: &str) -> Result<CompoundRecord, PubChemError> {
        let cid = self.search_cid(name).await?;
        debug!(name, cid, "resolved compound id");
        self.fetch_properties(cid).await
    }

    async fn search_cid(&self, name: &str) -> Result<u32, PubChemError> {
        let url = format!(
            "{}/rest/pug/compound/name/{}/JSON",
            self.base_url,
            urlencoding::encode(name)
        );
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(PubChemError::NotFound(name.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PubChemError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let reply: CompoundSearchResponse = response.json().await?;
        reply
            .compounds
            .first()
            .map(|compound| compound.id.id.cid)
            .ok_or_else(|| PubChemError::NotFound(name.to_string()))
    }

    async fn fetch_properties(&self, cid: u32) -> Result<CompoundRecord, PubChemError> {
        let url = format!(
            "{}/rest/pug/compound/cid/{}/property/MolecularFormula,MolecularWeight,CanonicalSMILES,IUPACName/JSON",
            self.base_url, cid
        );
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PubChemError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let reply: PropertyResponse = response.json().await?;
        let row = reply
            .property_table
            .properties
            .into_iter()
            .next()
            .ok_or_else(|| PubChemError::NotFound(cid.to_string()))?;

        Ok(row.into_record(cid))
    }
}

/// PNG rendering of a structure, parameterized by SMILES
pub fn structure_image_url(smiles: &str) -> String {
    format!(
        "{}/rest/pug/compound/smiles/{}/PNG",
        PUBCHEM_BASE_URL,
        urlencoding::encode(smiles)
    )
}

/// PubChem compound page for a resolved CID
pub fn compound_url(cid: u32) -> String {
    format!("{}/compound/{}", PUBCHEM_BASE_URL, cid)
}

/// MolView 3D viewer for a structure
pub fn molview_url(smiles: &str) -> String {
    format!("{}/?q={}", MOLVIEW_BASE_URL, urlencoding::encode(smiles))
}

/// ChemSpider search for a structure
pub fn chemspider_search_url(smiles: &str) -> String {
    format!(
        "{}/Search.aspx?q={}",
        CHEMSPIDER_BASE_URL,
        urlencoding::encode(smiles)
    )
}

/// Name-search response: `PC_Compounds[0].id.id.cid`
#[derive(Deserialize)]
struct CompoundSearchResponse {
    #[serde(rename = "PC_Compounds", default)]
    compounds: Vec<PcCompound>,
}

#[derive(Deserialize)]
struct PcCompound {
    id: PcCompoundId,
}

#[derive(Deserialize)]
struct PcCompoundId {
    id: PcCid,
}

#[derive(Deserialize)]
struct PcCid {
    cid: u32,
}

/// Property-fetch response
#[derive(Deserialize)]
struct PropertyResponse {
    #[serde(rename = "PropertyTable")]
    property_table: PropertyTable,
}

#[derive(Deserialize)]
struct PropertyTable {
    #[serde(rename = "Properties", default)]
    properties: Vec<PropertyRow>,
}

#[derive(Deserialize)]
struct PropertyRow {
    #[serde(rename = "MolecularFormula")]
    molecular_formula: Option<String>,
    /// PubChem serves the weight as a JSON number or a string depending on
    /// the endpoint version; coerced after decoding
    #[serde(rename = "MolecularWeight")]
    molecular_weight: Option<Value>,
    #[serde(rename = "CanonicalSMILES")]
    canonical_smiles: Option<String>,
    #[serde(rename = "IUPACName")]
    iupac_name: Option<String>,
}

impl PropertyRow {
    fn into_record(self, cid: u32) -> CompoundRecord {
        CompoundRecord {
            cid,
            molecular_formula: self.molecular_formula.unwrap_or_else(|| "N/A".to_string()),
            molecular_weight: coerce_weight(self.molecular_weight),
            canonical_smiles: self.canonical_smiles.unwrap_or_else(|| "N/A".to_string()),
            iupac_name: self.iupac_name.unwrap_or_else(|| "N/A".to_string()),
        }
    }
}

/// Weight arrives as a number or as text; text that does not parse as a
/// float is treated as absent, never as an error
fn coerce_weight(value: Option<Value>) -> Option<f64> {
    match value? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_weight_coercion() {
        assert_eq!(coerce_weight(Some(json!("46.07"))), Some(46.07));
        assert_eq!(coerce_weight(Some(json!("n/a"))), None);
        assert_eq!(coerce_weight(Some(json!(46.07))), Some(46.07));
        assert_eq!(coerce_weight(Some(json!(null))), None);
        assert_eq!(coerce_weight(None), None);
    }

    #[test]
    fn test_parse_name_search_response() {
        let body = r#"{
            "PC_Compounds": [
                {"id": {"id": {"cid": 702}}, "atoms": {"aid": [1, 2, 3]}}
            ]
        }"#;
        let reply: CompoundSearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(reply.compounds[0].id.id.cid, 702);
    }

    #[test]
    fn test_parse_property_response_with_string_weight() {
        let body = r#"{
            "PropertyTable": {
                "Properties": [
                    {
                        "CID": 702,
                        "MolecularFormula": "C2H6O",
                        "MolecularWeight": "46.07",
                        "CanonicalSMILES": "CCO",
                        "IUPACName": "ethanol"
                    }
                ]
            }
        }"#;
        let reply: PropertyResponse = serde_json::from_str(body).unwrap();
        let record = reply
            .property_table
            .properties
            .into_iter()
            .next()
            .unwrap()
            .into_record(702);
        assert_eq!(
            record,
            CompoundRecord {
                cid: 702,
                molecular_formula: "C2H6O".to_string(),
                molecular_weight: Some(46.07),
                canonical_smiles: "CCO".to_string(),
                iupac_name: "ethanol".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_properties_map_to_placeholders() {
        let body = r#"{"PropertyTable": {"Properties": [{"CID": 1}]}}"#;
        let reply: PropertyResponse = serde_json::from_str(body).unwrap();
        let record = reply
            .property_table
            .properties
            .into_iter()
            .next()
            .unwrap()
            .into_record(1);
        assert_eq!(record.molecular_formula, "N/A");
        assert_eq!(record.molecular_weight, None);
        assert_eq!(record.iupac_name, "N/A");
    }

    #[test]
    fn test_url_builders_encode_their_arguments() {
        assert_eq!(
            structure_image_url("CC(=O)O"),
            "https://pubchem.ncbi.nlm.nih.gov/rest/pug/compound/smiles/CC%28%3DO%29O/PNG"
        );
        assert_eq!(
            compound_url(241),
            "https://pubchem.ncbi.nlm.nih.gov/compound/241"
        );
        assert!(molview_url("c1ccccc1").starts_with("https://molview.org/?q="));
        assert!(chemspider_search_url("CC(=O)O").contains("Search.aspx?q=CC%28%3DO%29O"));
    }
}
