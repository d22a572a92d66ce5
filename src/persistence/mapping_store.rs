use super::StoreError;
use crate::controller::InputId;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

pub const MIN_SENSITIVITY: f32 = 0.2;
pub const MAX_SENSITIVITY: f32 = 5.0;

const MOUSE_SENSITIVITY_KEY: &str = "mouse_sensitivity";
const SCROLL_SENSITIVITY_KEY: &str = "scroll_sensitivity";
const INVERT_SCROLL_KEY: &str = "invert_scroll";

const DEFAULT_BINDINGS: [(InputId, &str); 17] = [
    (InputId::ButtonA, "left_click"),
    (InputId::ButtonB, "right_click"),
    (InputId::ButtonX, "media_play_pause"),
    (InputId::ButtonY, "voice_input"),
    (InputId::ButtonStart, "exit"),
    (InputId::ButtonBack, "escape"),
    (InputId::ButtonGuide, "windows_key"),
    (InputId::LeftShoulder, "middle_click"),
    (InputId::RightShoulder, "enter"),
    (InputId::LeftStickButton, "win_tab"),
    (InputId::RightStickButton, "screenshot"),
    (InputId::DPadUp, "increase_mouse_sensitivity"),
    (InputId::DPadDown, "decrease_mouse_sensitivity"),
    (InputId::DPadLeft, "decrease_scroll_sensitivity"),
    (InputId::DPadRight, "increase_scroll_sensitivity"),
    (InputId::LeftTrigger, "media_previous"),
    (InputId::RightTrigger, "media_next"),
];

const FILE_HEADER: &str = "\
# padmouse mapping
# Generated file, edits are kept on the next save
";

const ACTIONS_COMMENT: &str = "\
# Button mappings
# Available actions:
#   left_click, right_click, middle_click
#   media_play_pause, media_next, media_previous
#   voice_input, alt_tab, win_tab, escape, enter
#   windows_key, screenshot, volume_up, volume_down, volume_mute
#   browser_back, browser_forward
#   increase/decrease_mouse/scroll_sensitivity, exit
";

pub fn clamp_sensitivity(value: f32) -> f32 {
    value.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY)
}

/// Bindings plus pointer and scroll settings, as stored in the mapping file.
///
/// Binding keys are kept as plain strings so unknown keys survive a load/save cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct MappingStore {
    bindings: BTreeMap<String, String>,
    mouse_sensitivity: f32,
    scroll_sensitivity: f32,
    invert_scroll: bool,
}

impl Default for MappingStore {
    fn default() -> Self {
        Self::defaults()
    }
}

impl MappingStore {
    pub fn defaults() -> Self {
        Self {
            bindings: DEFAULT_BINDINGS
                .iter()
                .map(|(input, action)| (input.config_key().to_string(), action.to_string()))
                .collect(),
            mouse_sensitivity: 1.0,
            scroll_sensitivity: 1.0,
            invert_scroll: true,
        }
    }

    /// Defaults overlaid with every valid line of `text`
    pub fn parse(text: &str) -> Self {
        let mut store = Self::defaults();
        store.apply(text);
        store
    }

    /// Applies the lines of `text` on top of the current values
    pub fn apply(&mut self, text: &str) {
        for (number, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                warn!("Mapping line {} has no '=', skipped: {}", number + 1, line);
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            if key.is_empty() {
                warn!("Mapping line {} has an empty key, skipped", number + 1);
                continue;
            }

            match key {
                MOUSE_SENSITIVITY_KEY | SCROLL_SENSITIVITY_KEY => match value.parse::<f32>() {
                    Ok(parsed) if parsed.is_finite() => {
                        if key == MOUSE_SENSITIVITY_KEY {
                            self.set_mouse_sensitivity(parsed);
                        } else {
                            self.set_scroll_sensitivity(parsed);
                        }
                    }
                    _ => warn!(
                        "Mapping line {}: invalid value '{}' for {}",
                        number + 1,
                        value,
                        key
                    ),
                },
                INVERT_SCROLL_KEY => self.invert_scroll = value == "true" || value == "1",
                _ => {
                    if InputId::from_config_key(key).is_none() {
                        debug!("Keeping binding for unknown input '{}'", key);
                    }
                    self.bindings.insert(key.to_string(), value.to_string());
                }
            }
        }
    }

    /// File contents: header, scalars, then bindings sorted by key
    pub fn render(&self) -> String {
        let mut out = String::from(FILE_HEADER);
        out.push('\n');
        out.push_str("# Sensitivity settings\n");
        out.push_str(&format!(
            "{} = {}\n",
            MOUSE_SENSITIVITY_KEY, self.mouse_sensitivity
        ));
        out.push_str(&format!(
            "{} = {}\n",
            SCROLL_SENSITIVITY_KEY, self.scroll_sensitivity
        ));
        out.push_str(&format!("{} = {}\n", INVERT_SCROLL_KEY, self.invert_scroll));
        out.push('\n');
        out.push_str(ACTIONS_COMMENT);
        out.push('\n');
        for (key, value) in &self.bindings {
            out.push_str(&format!("{} = {}\n", key, value));
        }
        out
    }

    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| StoreError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        info!("Mapping loaded from {:?}", path);
        Ok(Self::parse(&text))
    }

    /// Loads `path`, or writes and returns the defaults when it does not exist yet.
    pub async fn load_or_default(path: &Path) -> Result<Self, StoreError> {
        match Self::load(path).await {
            Err(StoreError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
                info!("No mapping file at {:?}, creating defaults", path);
                let store = Self::defaults();
                store.save(path).await?;
                Ok(store)
            }
            other => other,
        }
    }

    pub async fn save(&self, path: &Path) -> Result<(), StoreError> {
        let write_error = |source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
        }
        tokio::fs::write(path, self.render())
            .await
            .map_err(write_error)?;
        debug!("Mapping saved to {:?}", path);
        Ok(())
    }

    /// Bound action name; empty or missing means unbound
    pub fn binding(&self, key: &str) -> Option<&str> {
        self.bindings.get(key).map(String::as_str)
    }

    pub fn binding_for(&self, input: InputId) -> Option<&str> {
        self.binding(input.config_key())
    }

    pub fn set_binding(&mut self, key: &str, action: &str) {
        self.bindings.insert(key.to_string(), action.to_string());
    }

    pub fn mouse_sensitivity(&self) -> f32 {
        self.mouse_sensitivity
    }

    pub fn scroll_sensitivity(&self) -> f32 {
        self.scroll_sensitivity
    }

    pub fn invert_scroll(&self) -> bool {
        self.invert_scroll
    }

    pub fn set_mouse_sensitivity(&mut self, value: f32) {
        self.mouse_sensitivity = clamp_sensitivity(value);
    }

    pub fn set_scroll_sensitivity(&mut self, value: f32) {
        self.scroll_sensitivity = clamp_sensitivity(value);
    }

    pub fn set_invert_scroll(&mut self, value: bool) {
        self.invert_scroll = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "
# comment
   # indented comment
mouse_sensitivity = 2.5
scroll_sensitivity=0.05
invert_scroll = 1
button_a = right_click
button_b =
paddle_1 = alt_tab
no separator here
 = orphan value
dpad_up = foo = bar
";

    #[test]
    fn defaults_bind_every_input() {
        let store = MappingStore::defaults();
        for input in InputId::ALL {
            assert!(store.binding_for(input).is_some(), "{input} unbound");
        }
        assert_eq!(store.binding("button_start"), Some("exit"));
        assert_eq!(store.mouse_sensitivity(), 1.0);
        assert_eq!(store.scroll_sensitivity(), 1.0);
        assert!(store.invert_scroll());
    }

    #[test]
    fn parse_overlays_defaults() {
        let store = MappingStore::parse(SAMPLE);
        assert_eq!(store.mouse_sensitivity(), 2.5);
        assert_eq!(store.scroll_sensitivity(), MIN_SENSITIVITY);
        assert!(store.invert_scroll());
        assert_eq!(store.binding("button_a"), Some("right_click"));
        assert_eq!(store.binding("button_b"), Some(""));
        assert_eq!(store.binding("paddle_1"), Some("alt_tab"));
        assert_eq!(store.binding("dpad_up"), Some("foo = bar"));
        assert_eq!(store.binding("button_x"), Some("media_play_pause"));
        assert_eq!(store.binding("no separator here"), None);
        assert_eq!(store.binding(""), None);
    }

    #[test]
    fn invalid_scalars_are_skipped() {
        let store = MappingStore::parse(
            "mouse_sensitivity = fast\nscroll_sensitivity = 9\ninvert_scroll = yes\n",
        );
        assert_eq!(store.mouse_sensitivity(), 1.0);
        assert_eq!(store.scroll_sensitivity(), MAX_SENSITIVITY);
        assert!(!store.invert_scroll());
    }

    #[test]
    fn render_then_parse_is_stable() {
        let loaded = MappingStore::parse(SAMPLE);
        let reloaded = MappingStore::parse(&loaded.render());
        assert_eq!(reloaded, loaded);
    }

    #[test]
    fn render_sorts_bindings_after_scalars() {
        let rendered = MappingStore::defaults().render();
        let lines: Vec<&str> = rendered
            .lines()
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .collect();
        assert_eq!(lines[0], "mouse_sensitivity = 1");
        assert_eq!(lines[1], "scroll_sensitivity = 1");
        assert_eq!(lines[2], "invert_scroll = true");
        let keys: Vec<&str> = lines[3..]
            .iter()
            .filter_map(|l| l.split_once(" = ").map(|(k, _)| k))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
        assert_eq!(keys.len(), 17);
    }

    #[test]
    fn setters_clamp() {
        let mut store = MappingStore::defaults();
        store.set_mouse_sensitivity(0.0);
        store.set_scroll_sensitivity(12.0);
        assert_eq!(store.mouse_sensitivity(), MIN_SENSITIVITY);
        assert_eq!(store.scroll_sensitivity(), MAX_SENSITIVITY);
    }

    #[tokio::test]
    async fn load_or_default_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("mapping.conf");

        let store = MappingStore::load_or_default(&path).await.unwrap();
        assert_eq!(store, MappingStore::defaults());
        assert!(path.exists());

        let reloaded = MappingStore::load(&path).await.unwrap();
        assert_eq!(reloaded, store);
    }

    #[tokio::test]
    async fn save_and_load_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.conf");

        let mut store = MappingStore::parse(SAMPLE);
        store.set_mouse_sensitivity(3.4);
        store.set_binding("button_y", "volume_mute");
        store.save(&path).await.unwrap();

        assert_eq!(MappingStore::load(&path).await.unwrap(), store);
    }

    #[tokio::test]
    async fn load_reports_unreadable_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = MappingStore::load_or_default(dir.path()).await;
        assert!(matches!(result, Err(StoreError::Read { .. })));
    }
}
