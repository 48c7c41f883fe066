//! StreamDeck plugin exposing the registered SleepNumber buttons.
//!
//! Each registered button entity becomes one key on the deck; pressing the
//! key presses the entity.

use std::sync::Arc;

use log::{debug, warn};
use streamdeck_oxide::{
    generic_array::ArrayLength,
    md_icons,
    plugins::{Plugin, PluginContext, PluginNavigation},
    view::customizable::{ClickButton, CustomizableView},
    View,
};

use crate::{
    button::ButtonDescription,
    config::SleepNumberConfig,
    entity::{ButtonEntity, EntityRegistry},
};

/// Plugin rendering one key per SleepNumber button.
///
/// The [`EntityRegistry`] and the [`SleepNumberConfig`] are read from the
/// plugin context.
#[derive(Clone)]
pub struct SleepNumberPlugin<W: ArrayLength, H: ArrayLength> {
    /// Optional navigation to return to when "Back" is pressed
    pub back_navigation: Option<PluginNavigation<W, H>>,
}

/// Number of keys available for buttons, leaving the last key for "Back".
fn button_slots(width: usize, height: usize, has_back: bool) -> usize {
    let keys = width * height;
    if has_back {
        keys.saturating_sub(1)
    } else {
        keys
    }
}

/// Picks the key label for an entity.
fn label(entity: &dyn ButtonEntity, config: &SleepNumberConfig) -> String {
    if config.short_labels {
        entity.short_name().to_string()
    } else {
        entity.name().to_string()
    }
}

/// Deck position of the `index`-th button, filling rows left to right.
fn key_position(index: usize, width: usize) -> (usize, usize) {
    (index % width, index / width)
}

/// Picks the entities to show, at most `slots` of them.
///
/// Entities whose key is not in `order` are skipped. The rest are grouped by
/// device in first-seen order and, within a device, sorted by the position of
/// their key in `order`.
fn select_entities(
    entities: Vec<Arc<dyn ButtonEntity>>,
    order: &[&ButtonDescription],
    slots: usize,
) -> Vec<Arc<dyn ButtonEntity>> {
    let mut devices: Vec<String> = Vec::new();
    let mut ranked = Vec::new();
    for entity in entities {
        let Some(position) = order.iter().position(|d| d.key == entity.key()) else {
            continue;
        };
        let device = match devices.iter().position(|d| d == entity.device_id()) {
            Some(device) => device,
            None => {
                devices.push(entity.device_id().to_string());
                devices.len() - 1
            }
        };
        ranked.push((device, position, entity));
    }
    ranked.sort_by_key(|(device, position, _)| (*device, *position));
    ranked
        .into_iter()
        .take(slots)
        .map(|(_, _, entity)| entity)
        .collect()
}

/// Presses `entity` for a deck key.
///
/// The press runs on its own task so the returned future stays `Sync`, as the
/// deck runtime requires.
async fn press_on_deck(entity: Arc<dyn ButtonEntity>) -> Result<(), String> {
    debug!("Deck key pressed for {}", entity.unique_id());
    let name = entity.name().to_string();
    let result = tokio::spawn(async move { entity.press().await })
        .await
        .map_err(|e| e.to_string())?;
    result.map_err(|e| {
        warn!("{} failed: {}", name, e);
        e.to_string()
    })
}

/// Adds a key that presses `entity` when clicked.
fn add_button<W, H>(
    view: &mut CustomizableView<W, H, PluginContext, PluginNavigation<W, H>>,
    x: usize,
    y: usize,
    entity: Arc<dyn ButtonEntity>,
    config: &SleepNumberConfig,
) -> Result<(), Box<dyn std::error::Error>>
where
    W: ArrayLength,
    H: ArrayLength,
{
    let text = label(entity.as_ref(), config);
    let icon = match entity.icon() {
        "mdi:target" => Some(md_icons::filled::ICON_ADJUST),
        "mdi:stop" => Some(md_icons::filled::ICON_STOP),
        _ => None,
    };
    view.set_button(
        x,
        y,
        ClickButton::new(&text, icon, move |_ctx: PluginContext| {
            let entity = entity.clone();
            async move {
                press_on_deck(entity).await?;
                Ok(())
            }
        }),
    )
}

/// Implementation of the StreamDeck Plugin trait for SleepNumberPlugin.
#[async_trait::async_trait]
impl<W, H> Plugin<W, H> for SleepNumberPlugin<W, H>
where
    W: ArrayLength,
    H: ArrayLength,
{
    fn name(&self) -> &'static str {
        "SleepNumberPlugin"
    }

    async fn get_view(
        &self,
        context: PluginContext,
    ) -> Result<
        Box<dyn View<W, H, PluginContext, PluginNavigation<W, H>>>,
        Box<dyn std::error::Error>,
    > {
        let config = context
            .get_context::<SleepNumberConfig>()
            .await
            .ok_or("Failed to get SleepNumberConfig")?;
        let registry = context
            .get_context::<EntityRegistry>()
            .await
            .ok_or("Failed to get EntityRegistry")?;

        let slots = button_slots(
            W::to_usize(),
            H::to_usize(),
            self.back_navigation.is_some(),
        );
        let order = config.descriptions()?;
        let entities = select_entities(registry.entities().await, &order, slots);

        let mut view = CustomizableView::new();
        for (index, entity) in entities.into_iter().enumerate() {
            let (x, y) = key_position(index, W::to_usize());
            add_button(&mut view, x, y, entity, &config)?;
        }

        if let Some(back_navigation) = &self.back_navigation {
            view.set_navigation(
                W::to_usize() - 1,
                H::to_usize() - 1,
                back_navigation.clone(),
                "Back",
                Some(md_icons::filled::ICON_ARROW_BACK),
            )?;
        }

        Ok(Box::new(view))
    }
}

#[cfg(test)]
mod tests {
    use std::{
        any::{Any, TypeId},
        collections::BTreeMap,
    };

    use rstest::rstest;
    use streamdeck_oxide::generic_array::typenum::{U3, U5};

    use super::*;
    use crate::bed::mock::RecordingBed;
    use crate::button::{async_setup_entry, SleepNumberButton, ENTITY_DESCRIPTIONS};
    use crate::bed::SleepIqBed;
    use crate::error::BedError;

    fn assert_send_sync<T: Send + Sync>(_: &T) {}

    fn buttons(beds: &[Arc<RecordingBed>]) -> Vec<Arc<dyn ButtonEntity>> {
        beds.iter()
            .flat_map(|bed| {
                ENTITY_DESCRIPTIONS.iter().map(move |description| {
                    Arc::new(SleepNumberButton::new(bed.clone(), description))
                        as Arc<dyn ButtonEntity>
                })
            })
            .collect()
    }

    fn ids(entities: &[Arc<dyn ButtonEntity>]) -> Vec<&str> {
        entities.iter().map(|e| e.unique_id()).collect()
    }

    fn order(keys: &[&str]) -> Vec<&'static ButtonDescription> {
        keys.iter()
            .map(|key| ButtonDescription::by_key(key).unwrap())
            .collect()
    }

    fn context_with(config: SleepNumberConfig, registry: Option<EntityRegistry>) -> PluginContext {
        let mut map: BTreeMap<TypeId, Box<dyn Any + Send + Sync>> = BTreeMap::from([(
            TypeId::of::<SleepNumberConfig>(),
            Box::new(Arc::new(config)) as Box<dyn Any + Send + Sync>,
        )]);
        if let Some(registry) = registry {
            map.insert(
                TypeId::of::<EntityRegistry>(),
                Box::new(Arc::new(registry)) as Box<dyn Any + Send + Sync>,
            );
        }
        PluginContext::new(map)
    }

    #[rstest]
    #[case(5, 3, false, 15)]
    #[case(5, 3, true, 14)]
    #[case(3, 2, true, 5)]
    #[case(0, 0, true, 0)]
    fn slots_leave_room_for_back(
        #[case] width: usize,
        #[case] height: usize,
        #[case] has_back: bool,
        #[case] expected: usize,
    ) {
        assert_eq!(expected, button_slots(width, height, has_back));
    }

    #[rstest]
    #[case(0, 5, (0, 0))]
    #[case(4, 5, (4, 0))]
    #[case(5, 5, (0, 1))]
    #[case(13, 5, (3, 2))]
    fn keys_fill_rows_first(
        #[case] index: usize,
        #[case] width: usize,
        #[case] expected: (usize, usize),
    ) {
        assert_eq!(expected, key_position(index, width));
    }

    #[rstest]
    #[case(true, "Stop Pump")]
    #[case(false, "SleepNumber Alice Stop Pump")]
    fn label_follows_config(#[case] short_labels: bool, #[case] expected: &str) {
        let button = SleepNumberButton::new(
            RecordingBed::new("bed-1", "Alice"),
            ButtonDescription::by_key("stop-pump").unwrap(),
        );
        let config = SleepNumberConfig {
            short_labels,
            ..SleepNumberConfig::default()
        };

        assert_eq!(expected, label(&button, &config));
    }

    #[test]
    fn selection_follows_configured_order_per_bed() {
        let entities = buttons(&[
            RecordingBed::new("bed-1", "Alice"),
            RecordingBed::new("bed-2", "Bob"),
        ]);

        let selected = select_entities(entities, &order(&["stop-pump", "calibrate"]), 15);

        assert_eq!(
            vec![
                "bed-1-stop-pump",
                "bed-1-calibrate",
                "bed-2-stop-pump",
                "bed-2-calibrate"
            ],
            ids(&selected)
        );
    }

    #[test]
    fn selection_skips_unconfigured_keys() {
        let entities = buttons(&[
            RecordingBed::new("bed-1", "Alice"),
            RecordingBed::new("bed-2", "Bob"),
        ]);

        let selected = select_entities(entities, &order(&["calibrate"]), 15);

        assert_eq!(vec!["bed-1-calibrate", "bed-2-calibrate"], ids(&selected));
    }

    #[test]
    fn selection_is_capped_at_slots() {
        let entities = buttons(&[
            RecordingBed::new("bed-1", "Alice"),
            RecordingBed::new("bed-2", "Bob"),
        ]);

        let selected = select_entities(entities, &order(&["calibrate", "stop-pump"]), 3);

        assert_eq!(
            vec!["bed-1-calibrate", "bed-1-stop-pump", "bed-2-calibrate"],
            ids(&selected)
        );
    }

    #[tokio::test]
    async fn deck_press_calls_bound_action() {
        let bed = RecordingBed::new("bed-1", "Alice");
        let entity = buttons(&[bed.clone()]).remove(1);

        press_on_deck(entity).await.unwrap();

        assert_eq!(vec!["stop_pump"], bed.calls());
    }

    #[tokio::test]
    async fn deck_press_failure_returns_message() {
        let bed = RecordingBed::failing("bed-1", "Alice", BedError::Unauthenticated);
        let entity = buttons(&[bed.clone()]).remove(0);

        let result = press_on_deck(entity).await;

        assert_eq!(Err(BedError::Unauthenticated.to_string()), result);
        assert_eq!(vec!["calibrate"], bed.calls());
    }

    #[test]
    fn deck_press_future_is_send_and_sync() {
        let entity = buttons(&[RecordingBed::new("bed-1", "Alice")]).remove(0);

        let press = press_on_deck(entity);

        assert_send_sync(&press);
    }

    #[tokio::test]
    async fn view_is_built_from_registry() {
        let registry = EntityRegistry::new();
        let mut beds: BTreeMap<String, Arc<dyn SleepIqBed>> = BTreeMap::new();
        beds.insert("bed-1".into(), RecordingBed::new("bed-1", "Alice"));
        async_setup_entry(&beds, &registry).await.unwrap();
        let context = context_with(SleepNumberConfig::default(), Some(registry));

        let plugin = SleepNumberPlugin::<U5, U3> {
            back_navigation: Some(PluginNavigation::new(SleepNumberPlugin::<U5, U3> {
                back_navigation: None,
            })),
        };

        assert!(plugin.get_view(context).await.is_ok());
    }

    #[tokio::test]
    async fn view_requires_registry() {
        let context = context_with(SleepNumberConfig::default(), None);
        let plugin = SleepNumberPlugin::<U5, U3> {
            back_navigation: None,
        };

        assert!(plugin.get_view(context).await.is_err());
    }
}
