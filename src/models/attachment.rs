//! Image and signature metadata. Payload bytes are stored separately in the
//! blob table under the same key.

use super::inspection_pk;
use crate::db::store::{Entity, ItemKey};
use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub fn image_sk(image_id: &str) -> String {
    format!("IMAGE#{image_id}")
}

pub fn signature_sk(kind: SignatureType) -> String {
    format!("SIGNATURE#{kind}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionImage {
    pub image_id: String,
    pub so_number: String,
    pub item_id: Option<String>,
    pub caption: Option<String>,
    pub file_name: Option<String>,
    pub mime_type: String,
    pub file_size: u64,
    pub uploaded_at: String,
}

impl Entity for InspectionImage {
    const ENTITY_TYPE: &'static str = "InspectionImage";

    fn key(&self) -> ItemKey {
        ItemKey::new(inspection_pk(&self.so_number), image_sk(&self.image_id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureType {
    Inspector,
    Tenant,
}

impl SignatureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inspector => "inspector",
            Self::Tenant => "tenant",
        }
    }
}

impl fmt::Display for SignatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inspector" => Ok(Self::Inspector),
            "tenant" => Ok(Self::Tenant),
            _ => Err(AppError::validation([format!(
                "signatureType must be inspector or tenant (got '{s}')"
            )])),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionSignature {
    pub signature_id: String,
    pub so_number: String,
    pub signature_type: SignatureType,
    pub signed_by: String,
    pub file_size: u64,
    pub signed_at: String,
}

impl Entity for InspectionSignature {
    const ENTITY_TYPE: &'static str = "InspectionSignature";

    fn key(&self) -> ItemKey {
        ItemKey::new(
            inspection_pk(&self.so_number),
            signature_sk(self.signature_type),
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadImageRequest {
    pub item_id: Option<String>,
    pub caption: Option<String>,
    pub image_data: String,
    pub mime_type: String,
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UploadSignatureRequest {
    pub signature_type: String,
    pub signed_by: String,
    pub signature_data: String,
    pub file_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_type_is_lowercase_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&SignatureType::Tenant).unwrap(),
            "\"tenant\""
        );
        assert_eq!(
            "Inspector".parse::<SignatureType>().unwrap(),
            SignatureType::Inspector
        );
        assert!("witness".parse::<SignatureType>().is_err());
        assert_eq!(signature_sk(SignatureType::Tenant), "SIGNATURE#tenant");
    }
}
