/// Visual parameters for a drawn hint or grid-cell batch (§6). Colors are
/// owned strings at this seam; a real native binding would intern them once
/// and hand the renderer a stable pointer, which is `neru-render`'s concern
/// (`CachedNativeString`), not this trait's.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub font_family: String,
    pub font_size: u32,
    pub text_color: String,
    pub background_color: String,
    pub matched_color: String,
    pub border_width: u32,
    pub padding: u32,
    pub border_radius: u32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            font_family: "Menlo".to_string(),
            font_size: 13,
            text_color: "#FFFFFF".to_string(),
            background_color: "#202020E0".to_string(),
            matched_color: "#FFD60AFF".to_string(),
            border_width: 1,
            padding: 2,
            border_radius: 4,
        }
    }
}
