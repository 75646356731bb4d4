use crate::extensions::PluginContext;
use crate::interaction::ChartEvent;

use super::Chart;

impl Chart {
    pub(super) fn plugin_context(&self) -> PluginContext {
        PluginContext {
            geometry: self.geometry,
            interaction_mode: self.pointer.mode(),
            is_zoomed: self.is_zoomed(),
            series_count: self.registrations.len(),
            generation: self.generation,
        }
    }

    /// Publishes on the mouse channel and lets plugins observe it.
    pub(super) fn publish_mouse(&mut self, event: ChartEvent) {
        self.mouse_channel.publish(event);
        self.pump_plugins();
    }

    /// Delivers queued channel events to plugins in registration order.
    pub(super) fn pump_plugins(&mut self) {
        let context = self.plugin_context();
        for slot in &mut self.plugins {
            for event in slot.mouse_events.drain() {
                slot.plugin.on_event(&event, &context);
            }
            for event in slot.zoom_events.drain() {
                slot.plugin.on_event(&event, &context);
            }
        }
    }
}
