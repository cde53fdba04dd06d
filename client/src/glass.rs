use leptos::prelude::*;

use crate::theme::Theme;

/// Translucent panel chrome shared by the dashboard panels.
#[component]
pub fn GlassPanel(#[prop(optional, into)] style: String, children: Children) -> impl IntoView {
    let theme: RwSignal<Theme> = expect_context();

    view! {
        <div
            style=move || {
                format!(
                    "backdrop-filter: blur(12px); background: rgba(0, 0, 0, 0.4); border: 1px solid {}; border-radius: 8px; box-shadow: 0 0 20px {}; transition: box-shadow 0.3s ease; {}",
                    theme.get().border(),
                    theme.get().glow(),
                    style,
                )
            }
        >
            {children()}
        </div>
    }
}
