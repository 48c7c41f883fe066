//! SleepNumber button entities.
//!
//! Every bed gets one button per entry of [`ENTITY_DESCRIPTIONS`]. Adding a
//! button type means appending a description (and an [`ButtonAction`] variant
//! when the bed client gains a new method).

use std::sync::Arc;

use log::debug;

use crate::{
    bed::{BedCollection, SleepIqBed},
    entity::{AddEntities, ButtonEntity},
    error::{BedError, RegistryError},
};

/// Prefix of every button display name
pub const NAME_PREFIX: &str = "SleepNumber";

/// Remote action a button triggers on its bed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    /// Start a calibration cycle, see [`SleepIqBed::calibrate`]
    Calibrate,
    /// Stop the air pump, see [`SleepIqBed::stop_pump`]
    StopPump,
}

impl ButtonAction {
    /// Invokes the matching bed client method once.
    pub async fn press(self, bed: &dyn SleepIqBed) -> Result<(), BedError> {
        match self {
            ButtonAction::Calibrate => bed.calibrate().await,
            ButtonAction::StopPump => bed.stop_pump().await,
        }
    }
}

/// Static description of one button type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonDescription {
    /// Stable key, appended to the bed id to form the unique id
    pub key: &'static str,
    /// Display name of the button
    pub name: &'static str,
    /// Icon hint in `mdi:<name>` form
    pub icon: &'static str,
    /// Bed client method invoked on press
    pub action: ButtonAction,
}

impl ButtonDescription {
    /// Finds the description registered under `key`.
    pub fn by_key(key: &str) -> Option<&'static ButtonDescription> {
        ENTITY_DESCRIPTIONS.iter().find(|d| d.key == key)
    }
}

/// Button types offered for every bed, in display order.
pub const ENTITY_DESCRIPTIONS: &[ButtonDescription] = &[
    ButtonDescription {
        key: "calibrate",
        name: "Calibrate",
        icon: "mdi:target",
        action: ButtonAction::Calibrate,
    },
    ButtonDescription {
        key: "stop-pump",
        name: "Stop Pump",
        icon: "mdi:stop",
        action: ButtonAction::StopPump,
    },
];

/// A button bound to one bed and one description.
pub struct SleepNumberButton {
    bed: Arc<dyn SleepIqBed>,
    description: &'static ButtonDescription,
    name: String,
    unique_id: String,
}

impl SleepNumberButton {
    /// Creates the button for one bed and one description.
    ///
    /// # Arguments
    ///
    /// * `bed` - The bed the button acts on, shared with the bed's other buttons
    /// * `description` - Entry of [`ENTITY_DESCRIPTIONS`] describing the button
    ///
    /// # Returns
    ///
    /// A button named `SleepNumber <bed name> <button name>` with the unique id
    /// `<bed id>-<key>`
    pub fn new(bed: Arc<dyn SleepIqBed>, description: &'static ButtonDescription) -> Self {
        let name = format!("{} {} {}", NAME_PREFIX, bed.name(), description.name);
        let unique_id = format!("{}-{}", bed.id(), description.key);
        Self {
            bed,
            description,
            name,
            unique_id,
        }
    }

    /// The bed this button acts on
    pub fn bed(&self) -> &Arc<dyn SleepIqBed> {
        &self.bed
    }

    /// The description this button was built from
    pub fn description(&self) -> &'static ButtonDescription {
        self.description
    }
}

#[async_trait::async_trait]
impl ButtonEntity for SleepNumberButton {
    fn name(&self) -> &str {
        &self.name
    }

    fn unique_id(&self) -> &str {
        &self.unique_id
    }

    fn key(&self) -> &str {
        self.description.key
    }

    fn device_id(&self) -> &str {
        self.bed.id()
    }

    fn icon(&self) -> &str {
        self.description.icon
    }

    fn short_name(&self) -> &str {
        self.description.name
    }

    async fn press(&self) -> Result<(), BedError> {
        debug!("{} pressed", self.unique_id);
        self.description.action.press(self.bed.as_ref()).await
    }
}

/// Builds the buttons for every known bed and registers them with `add_entities`.
///
/// Buttons are passed as a single batch, grouped by bed in bed order and then
/// in description order.
pub async fn async_setup_entry<B, A>(beds: &B, add_entities: &A) -> Result<(), RegistryError>
where
    B: BedCollection + ?Sized,
    A: AddEntities + ?Sized,
{
    let entities: Vec<Arc<dyn ButtonEntity>> = beds
        .beds()
        .into_iter()
        .flat_map(|bed| {
            ENTITY_DESCRIPTIONS.iter().map(move |description| {
                Arc::new(SleepNumberButton::new(bed.clone(), description)) as Arc<dyn ButtonEntity>
            })
        })
        .collect();
    debug!("Setting up {} SleepNumber buttons", entities.len());
    add_entities.add_entities(entities).await
}
