use std::{any::{Any, TypeId}, collections::BTreeMap, sync::Arc};

use log::info;
use sleepnumber_buttons::{
    async_setup_entry,
    config::{self, SleepNumberConfig},
    BedError, EntityRegistry, SleepIqBed, SleepNumberPlugin,
};
use streamdeck_oxide::{elgato_streamdeck, generic_array::typenum::{U3, U5}, plugins::{PluginContext, PluginNavigation}, run_with_external_triggers, ExternalTrigger, RenderConfig, Theme};

/// Stand-in for a SleepIQ client bed that only logs the requested action.
struct LoggingBed {
    id: String,
    name: String,
}

#[async_trait::async_trait]
impl SleepIqBed for LoggingBed {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn calibrate(&self) -> Result<(), BedError> {
        info!("Calibrating bed {}", self.id);
        Ok(())
    }

    async fn stop_pump(&self) -> Result<(), BedError> {
        info!("Stopping pump of bed {}", self.id);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Load the configuration
    let config: SleepNumberConfig = config::load_config("sleepnumber.yaml")?;
    let config = Arc::new(config);

    let mut beds: BTreeMap<String, Arc<dyn SleepIqBed>> = BTreeMap::new();
    beds.insert(
        "bed-1".to_string(),
        Arc::new(LoggingBed { id: "bed-1".to_string(), name: "Alice".to_string() }),
    );
    let registry = Arc::new(EntityRegistry::new());
    async_setup_entry(&beds, registry.as_ref()).await?;

    let hid = elgato_streamdeck::new_hidapi()?;
    let devices = elgato_streamdeck::list_devices(&hid);
    let (kind, serial) = devices
        .into_iter()
        .find(|(kind, _)| *kind == elgato_streamdeck::info::Kind::Mk2)
        .ok_or("No Stream Deck found")?;

    info!("Found Stream Deck: {:?} ({})", kind, serial);

    let deck = Arc::new(elgato_streamdeck::AsyncStreamDeck::connect(
        &hid, kind, &serial,
    )?);

    let context = PluginContext::new(
        BTreeMap::from([
            (TypeId::of::<SleepNumberConfig>(), Box::new(config.clone()) as Box<dyn Any + Send + Sync>),
            (TypeId::of::<EntityRegistry>(), Box::new(registry) as Box<dyn Any + Send + Sync>),
        ]),
    );

    let (sender, receiver) = tokio::sync::mpsc::channel::<ExternalTrigger<PluginNavigation<U5, U3>, U5, U3, PluginContext>>(1);

    sender.send(ExternalTrigger::new(
        PluginNavigation::<U5, U3>::new(SleepNumberPlugin {
            back_navigation: None,
        }),
        true
    )).await?;

    run_with_external_triggers(Theme::light(), RenderConfig::default(), deck, context, receiver).await?;

    Ok(())
}
