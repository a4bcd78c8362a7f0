/// Static configuration for [`JsonLayout`](crate::layout::JsonLayout).
///
/// Built once at startup and never mutated afterwards; the layout holds it
/// read-only, so a single layout can be shared freely across threads.
///
/// All fields are accepted as-is. Empty strings are tolerated and simply
/// become empty fields in the output record. `custom_log` is a JSON
/// fragment that may embed `%X{key}` placeholder tokens, resolved against
/// the ambient context on every format call; it defaults to `"{}"`.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
    pub environment: String,
    pub app_key: String,
    pub app_init: String,
    pub application: String,
    pub extension_type: String,
    pub system: String,
    pub sub_system: String,
    pub sub_application: String,
    pub paas_project: String,
    pub paas_app_version: String,
    pub component: String,
    pub custom_log: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            environment: String::new(),
            app_key: String::new(),
            app_init: String::new(),
            application: String::new(),
            extension_type: String::new(),
            system: String::new(),
            sub_system: String::new(),
            sub_application: String::new(),
            paas_project: String::new(),
            paas_app_version: String::new(),
            component: String::new(),
            custom_log: "{}".to_string(),
        }
    }
}
