mod hud;
mod timeline;

pub use hud::hud_plugin;
pub use timeline::timeline_plugin;
