use neru_events::NeruError;
use neru_geometry::Rect;

/// Coarse accessibility role tag carried on every enumerated `Element` (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Button,
    Link,
    TextField,
    CheckBox,
    RadioButton,
    MenuItem,
    Tab,
    Slider,
    Image,
    StaticText,
    Unknown,
}

/// An enumerated on-screen target, supplied by the `AccessibilityPort`
/// collaborator (§6). Immutable after construction; a moved element is
/// represented by constructing a new `Element`, never by mutating bounds in
/// place (§3).
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: String,
    bounds: Rect,
    role: Role,
    title: Option<String>,
    description: Option<String>,
    clickable: bool,
}

impl Element {
    pub fn new(
        id: impl Into<String>,
        bounds: Rect,
        role: Role,
        title: Option<String>,
        description: Option<String>,
        clickable: bool,
    ) -> Result<Self, NeruError> {
        let id = id.into();
        if id.is_empty() {
            return Err(NeruError::InvalidInput("element id must be non-empty".into()));
        }
        Ok(Self {
            id,
            bounds,
            role,
            title,
            description,
            clickable,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn clickable(&self) -> bool {
        self.clickable
    }
}
