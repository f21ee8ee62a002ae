use try_on::SlotRole;

pub(crate) const SPARKLES: &str = "✨";
pub(crate) const UPLOAD: &str = "⬆";
pub(crate) const DOWNLOAD: &str = "⬇";
pub(crate) const PICTURE: &str = "🖼";

pub(crate) fn role(role: SlotRole) -> &'static str {
    match role {
        SlotRole::Model => "👤",
        SlotRole::Garment => "👗",
    }
}
