use leptos::prelude::*;
use serde::{Deserialize, Serialize};

/// LocalStorage key the theme preference is persisted under.
pub const THEME_STORAGE_KEY: &str = "theme";

/// The two dashboard color schemes. The serialized form matches the
/// strings persisted in browser storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    NeonBlue,
    CyberPurple,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::NeonBlue => Self::CyberPurple,
            Self::CyberPurple => Self::NeonBlue,
        }
    }

    /// Primary accent color.
    pub fn accent(self) -> &'static str {
        match self {
            Self::NeonBlue => "#06b6d4",
            Self::CyberPurple => "#a855f7",
        }
    }

    /// Accent at panel-glow opacity.
    pub fn glow(self) -> &'static str {
        match self {
            Self::NeonBlue => "rgba(6, 182, 212, 0.2)",
            Self::CyberPurple => "rgba(168, 85, 247, 0.2)",
        }
    }

    /// Accent at map-glow opacity.
    pub fn map_glow(self) -> &'static str {
        match self {
            Self::NeonBlue => "rgba(6, 182, 212, 0.3)",
            Self::CyberPurple => "rgba(168, 85, 247, 0.3)",
        }
    }

    /// Accent at border opacity.
    pub fn border(self) -> &'static str {
        match self {
            Self::NeonBlue => "rgba(6, 182, 212, 0.3)",
            Self::CyberPurple => "rgba(168, 85, 247, 0.3)",
        }
    }

    /// Accent at hover-wash opacity.
    pub fn wash(self) -> &'static str {
        match self {
            Self::NeonBlue => "rgba(6, 182, 212, 0.1)",
            Self::CyberPurple => "rgba(168, 85, 247, 0.1)",
        }
    }

    /// Gradient endpoint for progress fills.
    pub fn gradient_end(self) -> &'static str {
        match self {
            Self::NeonBlue => "#3b82f6",
            Self::CyberPurple => "#ec4899",
        }
    }
}

/// Fixed toggle button in the top-right corner. Flips the theme and lets
/// the persistence effect in `App` write the new preference.
#[component]
pub fn ThemeToggle() -> impl IntoView {
    let theme: RwSignal<Theme> = expect_context();

    view! {
        <button
            title="Toggle Theme"
            style="position: fixed; top: 24px; right: 24px; z-index: 40; padding: 12px; border-radius: 8px; backdrop-filter: blur(12px); cursor: pointer; transition: all 0.3s ease;"
            style:background=move || theme.get().wash()
            style:border=move || format!("1px solid {}", theme.get().border())
            style:color=move || theme.get().accent()
            style:box-shadow=move || format!("0 0 20px {}", theme.get().glow())
            on:click=move |_| theme.update(|t| *t = t.toggled())
        >
            // Palette icon
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round" width="20" height="20" class="pulse">
                <circle cx="13.5" cy="6.5" r=".5" />
                <circle cx="17.5" cy="10.5" r=".5" />
                <circle cx="8.5" cy="7.5" r=".5" />
                <circle cx="6.5" cy="12.5" r=".5" />
                <path d="M12 2C6.5 2 2 6.5 2 12s4.5 10 10 10c.926 0 1.648-.746 1.648-1.688 0-.437-.18-.835-.437-1.125-.29-.289-.438-.652-.438-1.125a1.64 1.64 0 0 1 1.668-1.668h1.996c3.051 0 5.555-2.503 5.555-5.554C21.965 6.012 17.461 2 12 2z" />
            </svg>
        </button>
    }
}

#[cfg(test)]
mod tests {
    use super::Theme;

    #[test]
    fn persisted_form_matches_storage_strings() {
        assert_eq!(serde_json::to_string(&Theme::NeonBlue).unwrap(), "\"neon-blue\"");
        assert_eq!(serde_json::to_string(&Theme::CyberPurple).unwrap(), "\"cyber-purple\"");
        let back: Theme = serde_json::from_str("\"cyber-purple\"").unwrap();
        assert_eq!(back, Theme::CyberPurple);
    }

    #[test]
    fn toggle_flips_between_the_two_schemes() {
        assert_eq!(Theme::NeonBlue.toggled(), Theme::CyberPurple);
        assert_eq!(Theme::CyberPurple.toggled().toggled(), Theme::CyberPurple);
    }
}
