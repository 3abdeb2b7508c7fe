//! App settings

use crate::events::Event;
use crate::slice::{Slice, SliceContext};
use halcyon_core::Settings;

/// Settings slice
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SettingsState {
    /// Current settings
    pub settings: Settings,
}

impl Slice for SettingsState {
    fn initial(ctx: &SliceContext) -> Self {
        Self {
            settings: ctx.settings.clone(),
        }
    }

    fn reduce(&mut self, event: &Event) {
        match event {
            Event::GeneralSettingsChanged(general) => self.settings.general = general.clone(),
            Event::NetworkSettingsChanged(network) => self.settings.network = network.clone(),
            _ => {}
        }
    }

    fn on_wallet_locked(&mut self, ctx: &SliceContext) {
        *self = Self::initial(ctx);
    }

    fn on_wallet_switched(&mut self, ctx: &SliceContext) {
        *self = Self::initial(ctx);
    }

    fn on_active_wallet_deleted(&mut self, ctx: &SliceContext) {
        *self = Self::initial(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halcyon_core::{GeneralSettings, ThemeMode};

    #[test]
    fn test_general_change() {
        let mut state = SettingsState::initial(&SliceContext::default());
        let general = GeneralSettings {
            theme: ThemeMode::Dark,
            ..GeneralSettings::default()
        };
        state.reduce(&Event::GeneralSettingsChanged(general.clone()));
        assert_eq!(state.settings.general, general);
    }
}
