//! JSON bodies exchanged with the recoloring backend.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::HexColor;

/// `POST /update_color`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateColorBody {
    pub icon_name: String,
    pub group_id: String,
    pub color: HexColor,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    pub mode: String,
}

/// `POST /single-color/update`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleColorBody {
    pub icon_name: String,
    pub color: HexColor,
    pub mode: String,
}

/// `POST /single-color/revert`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SingleColorRevertBody {
    pub icon_name: String,
    pub mode: String,
}

/// `POST /greyscale` and `POST /revert`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorfulBody {
    pub icon_name: String,
    pub folder: String,
}

/// `POST /download-svg`, `/export-png` and `/export-svg`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBody {
    pub icon_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
}

/// `POST /export-zip`. `folders` runs parallel to `items`; `folder` is kept
/// for backends that only read a single folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipBody {
    pub items: Vec<String>,
    pub folders: Vec<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub folder: String,
    pub format: String,
    pub mode: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusReply {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupsReply {
    #[serde(default)]
    pub groups: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SvgMarkupReply {
    #[serde(default)]
    pub svg_content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FolderListingReply {
    #[serde(default)]
    pub folders: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlagListingReply {
    #[serde(default)]
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SingleColorListingReply {
    #[serde(default)]
    pub icons: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GREY_DARK;

    #[test]
    fn test_update_body_shape() {
        let body = UpdateColorBody {
            icon_name: "gear.svg".to_owned(),
            group_id: "Grey".to_owned(),
            color: GREY_DARK,
            kind: "icons".to_owned(),
            folder: None,
            mode: "dark".to_owned(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["color"], "#D3D3D3");
        assert_eq!(json["type"], "icons");
        assert!(json.get("folder").is_none());
    }

    #[test]
    fn test_listing_replies_tolerate_missing_fields() {
        let reply: SingleColorListingReply = serde_json::from_str("{}").unwrap();
        assert!(reply.icons.is_empty());
        let reply: FolderListingReply =
            serde_json::from_str(r#"{"folders":{"System":["gear","cog"]}}"#).unwrap();
        assert_eq!(reply.folders["System"], vec!["gear", "cog"]);
    }
}
