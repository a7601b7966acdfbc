use desktop_runtime::{
    route_table, ContentRegistry, DesktopHost, DesktopRuntime, DesktopShell, MessageBoxRequest,
};
use leptos::*;
use leptos_meta::*;
use leptos_router::*;

use crate::panels::register_panels;

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Marketdesk" />
        <Meta name="description" content="Marketplace workspace with a desktop-style window manager." />

        <Router>
            <main class="site-root">
                <Routes>
                    <Route path="/*any" view=DesktopEntry />
                </Routes>
            </main>
        </Router>
    }
}

#[component]
pub fn DesktopEntry() -> impl IntoView {
    let host = DesktopHost::new(
        platform_host_web::key_value_store(),
        platform_host_web::navigator(),
    );
    let runtime = DesktopRuntime::new(host, ContentRegistry::default());
    register_panels(runtime);

    let location = use_location();
    create_effect(move |_| {
        let path = location.pathname.get();
        runtime.navigation_changed(path);
    });

    let on_menu_command = move |command: String| handle_menu_command(runtime, &command);

    view! { <DesktopShell runtime on_menu_command /> }
}

fn handle_menu_command(runtime: DesktopRuntime, command: &str) {
    let Some(component) = command.strip_prefix("icon.properties:") else {
        logging::warn!("unhandled desktop menu command `{command}`");
        return;
    };
    let message = match route_table().iter().find(|route| route.component == component) {
        Some(route) => format!(
            "{}\nAddress: {}\nWindow id: {}",
            route.title, route.path, route.window_id
        ),
        None => format!("{component} has no address."),
    };
    let response = runtime.show_message_box(MessageBoxRequest::new("Properties", message));
    spawn_local(async move {
        let _ = response.await;
    });
}
