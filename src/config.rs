/// Renderer knobs shared by projection and drawing.
///
/// The demo binary fills this from the command line; tests build it with
/// struct-update syntax over [`RenderConfig::default`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    /// Full-bright sprites ignore the sector colormap and use the plain
    /// white-light/black-fade table.
    pub fullbright_ignores_sector_color: bool,
    /// Distance diminishing factor (8.0 is the classic look).
    pub visibility: f32,
    /// Horizontal field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fullbright_ignores_sector_color: false,
            visibility: 8.0,
            fov_degrees: 90.0,
        }
    }
}
