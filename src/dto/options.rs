use serde::Serialize;
use utoipa::ToSchema;

use crate::dto::game::{GenreSummary, PlatformSummary};

/// One entry of a drop-down selector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct SelectOption {
    /// Identifier submitted when the option is picked.
    pub value: i64,
    /// Label shown to the user.
    pub text: String,
    /// Whether the option is preselected.
    pub selected: bool,
}

impl SelectOption {
    /// Build a selector from `(value, text)` pairs, flagging `selected` if present.
    pub fn list<I>(items: I, selected: Option<i64>) -> Vec<Self>
    where
        I: IntoIterator<Item = (i64, String)>,
    {
        items
            .into_iter()
            .map(|(value, text)| Self {
                value,
                text,
                selected: selected == Some(value),
            })
            .collect()
    }
}

/// Genre selector with the current genre preselected.
pub fn genre_options(genres: Vec<GenreSummary>, selected: Option<i64>) -> Vec<SelectOption> {
    SelectOption::list(genres.into_iter().map(|g| (g.id, g.name)), selected)
}

/// Platform selector; nothing is preselected.
pub fn platform_options(platforms: Vec<PlatformSummary>) -> Vec<SelectOption> {
    SelectOption::list(platforms.into_iter().map(|p| (p.id, p.name)), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_only_the_selected_value() {
        let options = genre_options(
            vec![
                GenreSummary {
                    id: 1,
                    name: "RPG".into(),
                },
                GenreSummary {
                    id: 2,
                    name: "Action".into(),
                },
            ],
            Some(2),
        );

        assert_eq!(options.len(), 2);
        assert!(!options[0].selected);
        assert!(options[1].selected);
        assert_eq!(options[1].text, "Action");
    }

    #[test]
    fn platform_options_have_no_selection() {
        let options = platform_options(vec![PlatformSummary {
            id: 4,
            name: "SNES".into(),
        }]);
        assert_eq!(
            options,
            vec![SelectOption {
                value: 4,
                text: "SNES".into(),
                selected: false,
            }]
        );
    }
}
