use tracing::debug;

use crate::error::{ChartError, ChartResult};
use crate::extensions::ChartPlugin;

use super::Chart;
use super::chart::PluginSlot;

impl Chart {
    /// Registers a plugin with unique identifier.
    ///
    /// The plugin observes mouse and zoom events published after this call.
    pub fn register_plugin(&mut self, plugin: Box<dyn ChartPlugin>) -> ChartResult<()> {
        self.ensure_alive()?;
        let plugin_id = plugin.id().to_owned();
        if plugin_id.is_empty() {
            return Err(ChartError::InvalidData(
                "plugin id must not be empty".to_owned(),
            ));
        }
        if self.has_plugin(&plugin_id) {
            return Err(ChartError::InvalidData(format!(
                "plugin with id `{plugin_id}` is already registered"
            )));
        }
        self.plugins.push(PluginSlot {
            plugin,
            mouse_events: self.mouse_channel.subscribe(),
            zoom_events: self.zoom_channel.subscribe(),
        });
        debug!(plugin = %plugin_id, "plugin registered");
        Ok(())
    }

    /// Unregisters a plugin by id. Returns `true` when removed.
    ///
    /// Its channel subscriptions are dropped with it.
    pub fn unregister_plugin(&mut self, plugin_id: &str) -> bool {
        if let Some(position) = self
            .plugins
            .iter()
            .position(|slot| slot.plugin.id() == plugin_id)
        {
            self.plugins.remove(position);
            debug!(plugin = %plugin_id, "plugin unregistered");
            return true;
        }
        false
    }

    #[must_use]
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    #[must_use]
    pub fn has_plugin(&self, plugin_id: &str) -> bool {
        self.plugins.iter().any(|slot| slot.plugin.id() == plugin_id)
    }

    #[must_use]
    pub fn plugin(&self, plugin_id: &str) -> Option<&dyn ChartPlugin> {
        self.plugins
            .iter()
            .find(|slot| slot.plugin.id() == plugin_id)
            .map(|slot| slot.plugin.as_ref())
    }
}
