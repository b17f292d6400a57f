use docent_util::ThemeName;

use super::{DraculaTheme, NordTheme, Theme};

/// Describes a selectable theme.
#[derive(Clone, Copy, Debug)]
pub struct ThemeDefinition {
    pub name: ThemeName,
    /// Human-friendly display name.
    pub label: &'static str,
    factory: fn() -> Box<dyn Theme>,
}

impl ThemeDefinition {
    /// Instantiate the theme represented by this definition.
    pub fn build(&self) -> Box<dyn Theme> {
        (self.factory)()
    }
}

pub const THEME_DEFINITIONS: &[ThemeDefinition] = &[
    ThemeDefinition {
        name: ThemeName::Dracula,
        label: "Dracula",
        factory: || Box::new(DraculaTheme::new()),
    },
    ThemeDefinition {
        name: ThemeName::Nord,
        label: "Nord",
        factory: || Box::new(NordTheme::new()),
    },
];

pub fn resolve(name: ThemeName) -> &'static ThemeDefinition {
    THEME_DEFINITIONS
        .iter()
        .find(|definition| definition.name == name)
        .unwrap_or(&THEME_DEFINITIONS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_theme_name_has_a_definition() {
        for name in [ThemeName::Dracula, ThemeName::Nord] {
            assert_eq!(resolve(name).name, name);
        }
    }
}
