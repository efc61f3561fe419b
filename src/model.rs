use std::fmt;

use serde::{Deserialize, Serialize};

/// Light-background default for grey groups.
pub const GREY_LIGHT: HexColor = HexColor::from_rgb(0x28, 0x28, 0x28);
/// Dark-background default for grey groups.
pub const GREY_DARK: HexColor = HexColor::from_rgb(0xD3, 0xD3, 0xD3);
/// Original accent of the "Color" group on multi-part icons.
pub const ORIGINAL_BLUE: HexColor = HexColor::from_rgb(0x00, 0xAB, 0xF6);
/// Initial value of the color picker.
pub const INITIAL_PICKER: HexColor = HexColor::from_rgb(0xFF, 0x00, 0x00);

/// Company palette, shown as clickable swatches.
pub const PALETTE: [(&str, HexColor); 6] = [
    ("Grey", HexColor::from_rgb(0x28, 0x28, 0x28)),
    ("Yellow", HexColor::from_rgb(0xD6, 0xE1, 0x01)),
    ("Orange", HexColor::from_rgb(0xFF, 0x93, 0x1D)),
    ("Black", HexColor::from_rgb(0x00, 0x00, 0x00)),
    ("Blue", HexColor::from_rgb(0x00, 0xAB, 0xF6)),
    ("Red", HexColor::from_rgb(0xFE, 0x20, 0x01)),
];

/// The four recolorable asset families. Each one is also a browser tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetKind {
    Icon,
    ColorfulIcon,
    SingleColorIcon,
    Flag,
}

impl AssetKind {
    pub const ALL: [AssetKind; 4] = [
        AssetKind::Icon,
        AssetKind::ColorfulIcon,
        AssetKind::SingleColorIcon,
        AssetKind::Flag,
    ];

    /// Tab label in the browser panel
    pub fn label(self) -> &'static str {
        match self {
            AssetKind::Icon => "Icons",
            AssetKind::ColorfulIcon => "Colorful Icons",
            AssetKind::SingleColorIcon => "Single Color",
            AssetKind::Flag => "Flags",
        }
    }

    /// Value of the `type` field the backend expects in update requests
    pub fn wire_type(self) -> &'static str {
        match self {
            AssetKind::Icon => "icons",
            AssetKind::ColorfulIcon => "colorful-icons",
            AssetKind::SingleColorIcon => "single-color",
            AssetKind::Flag => "flags",
        }
    }

    /// Value of the `type` field the backend expects in export requests
    pub fn export_type(self) -> &'static str {
        match self {
            AssetKind::Icon => "icon",
            AssetKind::ColorfulIcon => "colorful-icon",
            AssetKind::SingleColorIcon => "single-color",
            AssetKind::Flag => "flag",
        }
    }

    /// Whether items of this kind live in folders
    pub fn has_folders(self) -> bool {
        matches!(self, AssetKind::Icon | AssetKind::ColorfulIcon)
    }

    /// Plural noun used in notifications
    pub fn noun(self) -> &'static str {
        match self {
            AssetKind::Icon => "icons",
            AssetKind::ColorfulIcon => "colorful icons",
            AssetKind::SingleColorIcon => "single color icons",
            AssetKind::Flag => "flags",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn from_dark(dark: bool) -> Self {
        if dark { ThemeMode::Dark } else { ThemeMode::Light }
    }

    pub fn is_dark(self) -> bool {
        self == ThemeMode::Dark
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// Default color for grey groups against this background
    pub fn default_grey(self) -> HexColor {
        match self {
            ThemeMode::Light => GREY_LIGHT,
            ThemeMode::Dark => GREY_DARK,
        }
    }
}

/// Folder an item was found in. Items outside any sub-folder live in `Root`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Folder {
    #[default]
    Root,
    Named(String),
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() || name == "Root" {
            Folder::Root
        } else {
            Folder::Named(name)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Folder::Root => "Root",
            Folder::Named(name) => name,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Folder::Root)
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FlagShape {
    #[default]
    Rectangle,
    Circle,
}

impl FlagShape {
    /// File name of a country's flag in this shape
    pub fn file_name(self, country: &str) -> String {
        match self {
            FlagShape::Rectangle => format!("{country}.svg"),
            FlagShape::Circle => format!("{country}_circle.svg"),
        }
    }
}

/// Identifies one recolorable asset. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemRef {
    pub name: String,
    pub kind: AssetKind,
    pub folder: Folder,
}

impl ItemRef {
    pub fn new(name: impl Into<String>, kind: AssetKind, folder: Folder) -> Self {
        Self {
            name: name.into(),
            kind,
            folder,
        }
    }
}

/// What a group name means for default and original colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupRole {
    Grey,
    Accent,
    Other,
}

/// Name of an independently recolorable sub-part of an icon, as reported by
/// the backend. The role is classified once, at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupName(String);

impl GroupName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn role(&self) -> GroupRole {
        let lower = self.0.to_lowercase();
        if lower.contains("grey") {
            GroupRole::Grey
        } else if lower.contains("color") {
            GroupRole::Accent
        } else {
            GroupRole::Other
        }
    }

    /// Color this group had before any override
    pub fn original_color(&self, mode: ThemeMode) -> HexColor {
        match self.role() {
            GroupRole::Accent => ORIGINAL_BLUE,
            GroupRole::Grey => mode.default_grey(),
            GroupRole::Other => GREY_LIGHT,
        }
    }
}

impl fmt::Display for GroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Target of a recolor: either a named group or the asset as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupTarget {
    WholeAsset,
    Named(GroupName),
}

impl GroupTarget {
    pub fn named(name: impl Into<String>) -> Self {
        GroupTarget::Named(GroupName::new(name))
    }

    /// Group id sent over the wire. Whole-asset recolors use a per-kind sentinel.
    pub fn wire_id(&self, kind: AssetKind) -> &str {
        match self {
            GroupTarget::Named(name) => name.as_str(),
            GroupTarget::WholeAsset if kind == AssetKind::Flag => "entire_flag",
            GroupTarget::WholeAsset => "entire_icon",
        }
    }

    pub fn group_name(&self) -> Option<&GroupName> {
        match self {
            GroupTarget::Named(name) => Some(name),
            GroupTarget::WholeAsset => None,
        }
    }
}

impl fmt::Display for GroupTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupTarget::WholeAsset => f.write_str("whole asset"),
            GroupTarget::Named(name) => write!(f, "{name}"),
        }
    }
}

/// An opaque RGB color, written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor([u8; 3]);

impl HexColor {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Parses `#RRGGBB`, `RRGGBB` or the short `#RGB` form
    pub fn parse(text: &str) -> Option<Self> {
        let digits = text.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_owned(),
            _ => return None,
        };
        let value = u32::from_str_radix(&expanded, 16).ok()?;
        Some(Self([(value >> 16) as u8, (value >> 8) as u8, value as u8]))
    }

    pub fn rgb(self) -> [u8; 3] {
        self.0
    }

    pub fn to_color32(self) -> egui::Color32 {
        let [r, g, b] = self.0;
        egui::Color32::from_rgb(r, g, b)
    }

    pub fn from_color32(color: egui::Color32) -> Self {
        Self([color.r(), color.g(), color.b()])
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02X}{g:02X}{b:02X}")
    }
}

impl TryFrom<String> for HexColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        HexColor::parse(&value).ok_or_else(|| format!("invalid hex color: {value}"))
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parse_and_display() {
        assert_eq!(HexColor::parse("#00abf6"), Some(ORIGINAL_BLUE));
        assert_eq!(HexColor::parse("D3D3D3"), Some(GREY_DARK));
        assert_eq!(HexColor::parse("#fff"), Some(HexColor::from_rgb(255, 255, 255)));
        assert_eq!(HexColor::parse("#12345"), None);
        assert_eq!(HexColor::parse("#zzzzzz"), None);
        assert_eq!(ORIGINAL_BLUE.to_string(), "#00ABF6");
    }

    #[test]
    fn test_parse_rejects_signed_input() {
        assert_eq!(HexColor::parse("+12345"), None);
        assert_eq!(HexColor::parse("#+12345"), None);
        assert_eq!(HexColor::parse("-12345"), None);
        assert_eq!(HexColor::parse("+ab"), None);
        assert_eq!(HexColor::parse(" #abc "), Some(HexColor::from_rgb(0xaa, 0xbb, 0xcc)));
    }

    #[test]
    fn test_group_roles() {
        assert_eq!(GroupName::new("Grey").role(), GroupRole::Grey);
        assert_eq!(GroupName::new("dark_GREY_2").role(), GroupRole::Grey);
        assert_eq!(GroupName::new("Color").role(), GroupRole::Accent);
        assert_eq!(GroupName::new("Outline").role(), GroupRole::Other);
        assert_eq!(GroupName::new("Grey").original_color(ThemeMode::Dark), GREY_DARK);
        assert_eq!(GroupName::new("Color").original_color(ThemeMode::Dark), ORIGINAL_BLUE);
    }

    #[test]
    fn test_whole_asset_sentinels() {
        assert_eq!(GroupTarget::WholeAsset.wire_id(AssetKind::Flag), "entire_flag");
        assert_eq!(GroupTarget::WholeAsset.wire_id(AssetKind::Icon), "entire_icon");
        assert_eq!(GroupTarget::named("Grey").wire_id(AssetKind::Icon), "Grey");
    }

    #[test]
    fn test_folder_root_normalisation() {
        assert_eq!(Folder::new("Root"), Folder::Root);
        assert_eq!(Folder::new(""), Folder::Root);
        assert_eq!(Folder::new("System").as_str(), "System");
    }
}
