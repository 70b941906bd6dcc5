//! Player character controller
//!
//! Every display frame the player turns toward the point under the cursor
//! (projected onto the horizontal plane through the player) and reads the
//! movement axes. Movement itself happens on the fixed tick through the
//! physics world, so walls stop the player.
//!
//! Walking into a trigger tagged with `pickup_tag` highlights the item and
//! shows the prompt. Pressing the action key while it is in range collects it
//! and schedules the win scene.

use keyhunt_core::{
    Behaviour, BehaviourContext, EntityKey, KeyCode, LoadMode, Material, TriggerContact, UiKey,
};
use keyhunt_input::{HORIZONTAL, VERTICAL};
use keyhunt_math::{look_rotation, slerp_clamped, Plane, Vec3, DIRECTION_EPSILON_SQ};
use std::any::Any;
use std::time::Duration;

/// Where the player is in the pickup flow
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionState {
    NoItemInRange,
    ItemInRange,
    /// Terminal; the win scene load is scheduled
    GameWon,
}

/// Tunables for [`PlayerController`]
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerSettings {
    /// Movement speed in units per second
    pub speed: f32,
    /// Turn rate; multiplied by the frame delta to get the slerp factor
    pub rotation_speed: f32,
    pub action_key: KeyCode,
    /// Trigger tag that marks a collectible
    pub pickup_tag: String,
    pub highlight: Material,
    pub prompt_text: String,
    pub win_scene: String,
    pub win_delay: Duration,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            speed: 2.0,
            rotation_speed: 1.5,
            action_key: KeyCode::Space,
            pickup_tag: "Key".to_string(),
            highlight: Material::BLUE,
            prompt_text: "Press SPACE to collect the key and win the game!".to_string(),
            win_scene: "WinScene".to_string(),
            win_delay: Duration::from_secs(1),
        }
    }
}

/// Drives the entity it is attached to
#[derive(Clone, Debug)]
pub struct PlayerController {
    settings: PlayerSettings,
    prompt: Option<UiKey>,
    win_banner: Option<UiKey>,
    move_intent: Vec3,
    item_in_range: Option<EntityKey>,
    item_material: Option<Material>,
    won: bool,
}

impl PlayerController {
    pub fn new(settings: PlayerSettings) -> Self {
        Self {
            settings,
            prompt: None,
            win_banner: None,
            move_intent: Vec3::ZERO,
            item_in_range: None,
            item_material: None,
            won: false,
        }
    }

    /// Bind the label that shows the pickup prompt
    pub fn with_prompt(mut self, prompt: Option<UiKey>) -> Self {
        self.prompt = prompt;
        self
    }

    /// Bind the label shown on winning
    pub fn with_win_banner(mut self, banner: Option<UiKey>) -> Self {
        self.win_banner = banner;
        self
    }

    pub fn settings(&self) -> &PlayerSettings {
        &self.settings
    }

    /// Normalized world-space movement direction from the last frame's input
    pub fn move_intent(&self) -> Vec3 {
        self.move_intent
    }

    pub fn item_in_range(&self) -> Option<EntityKey> {
        self.item_in_range
    }

    pub fn has_won(&self) -> bool {
        self.won
    }

    pub fn state(&self) -> InteractionState {
        if self.won {
            InteractionState::GameWon
        } else if self.item_in_range.is_some() {
            InteractionState::ItemInRange
        } else {
            InteractionState::NoItemInRange
        }
    }

    fn face_cursor(&self, ctx: &mut BehaviourContext<'_>) {
        let Some(ray) = ctx.world.screen_point_to_ray(ctx.input.cursor_position()) else {
            return;
        };
        let Some(player) = ctx.world.get_entity_mut(ctx.owner) else {
            return;
        };

        let mut transform = player.transform;
        let ground = Plane::from_normal_and_point(Vec3::Y, transform.position);
        let Some(t) = ground.raycast(&ray) else {
            return;
        };

        let mut direction = ray.point_at(t) - transform.position;
        direction.y = 0.0;
        if direction.length_squared() <= DIRECTION_EPSILON_SQ {
            return;
        }
        let Some(look) = look_rotation(direction, Vec3::Y) else {
            return;
        };

        transform.rotation = slerp_clamped(
            transform.rotation,
            look,
            self.settings.rotation_speed * ctx.time.delta,
        );
        player.set_transform(transform);
    }

    fn read_movement(&mut self, ctx: &BehaviourContext<'_>) {
        let Some(player) = ctx.world.get_entity(ctx.owner) else {
            self.move_intent = Vec3::ZERO;
            return;
        };

        let horizontal = ctx.input.axis_raw(HORIZONTAL);
        let vertical = ctx.input.axis_raw(VERTICAL);
        let transform = &player.transform;
        self.move_intent =
            (transform.forward() * vertical + transform.right() * horizontal).normalize_or_zero();
    }

    fn collect(&mut self, ctx: &mut BehaviourContext<'_>) {
        let Some(item) = self.item_in_range.take() else {
            return;
        };
        self.item_material = None;
        self.won = true;

        log::info!("You collected the key! You win!");
        ctx.world.despawn(item);

        if let Some(prompt) = self.prompt {
            ctx.ui.set_text(prompt, "");
        }
        if let Some(banner) = self.win_banner {
            ctx.ui.set_visible(banner, true);
        }
        ctx.scheduler.schedule_scene_load(
            self.settings.win_scene.clone(),
            self.settings.win_delay,
            LoadMode::Single,
        );
    }
}

/// Log line shown when a collectible comes into range
fn pickup_hint(key: KeyCode) -> String {
    format!("Press {:?} to win!", key)
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(PlayerSettings::default())
    }
}

impl Behaviour for PlayerController {
    fn on_frame(&mut self, ctx: &mut BehaviourContext<'_>) {
        self.face_cursor(ctx);
        self.read_movement(ctx);

        if !self.won && self.item_in_range.is_some() && ctx.input.key_down(self.settings.action_key)
        {
            self.collect(ctx);
        }
    }

    fn on_fixed_tick(&mut self, ctx: &mut BehaviourContext<'_>) {
        if self.move_intent.length_squared() <= DIRECTION_EPSILON_SQ {
            return;
        }
        let Some(position) = ctx.world.get_entity(ctx.owner).map(|e| e.transform.position) else {
            return;
        };
        let step = self.move_intent * self.settings.speed * ctx.time.fixed_delta;
        ctx.world.move_entity(ctx.owner, position + step);
    }

    fn on_trigger_enter(&mut self, ctx: &mut BehaviourContext<'_>, contact: &TriggerContact) {
        if self.won || contact.tag != self.settings.pickup_tag {
            return;
        }
        if let Some(current) = self.item_in_range {
            if current != contact.entity {
                log::debug!("Ignoring {:?}: {:?} is already in range", contact.entity, current);
            }
            return;
        }
        let Some(item) = ctx.world.get_entity_mut(contact.entity) else {
            return;
        };

        self.item_material = Some(item.material);
        item.set_material(self.settings.highlight);
        self.item_in_range = Some(contact.entity);

        if let Some(prompt) = self.prompt {
            ctx.ui.set_text(prompt, self.settings.prompt_text.clone());
        }
        log::info!("{}", pickup_hint(self.settings.action_key));
    }

    fn on_trigger_exit(&mut self, ctx: &mut BehaviourContext<'_>, contact: &TriggerContact) {
        if self.item_in_range != Some(contact.entity) {
            return;
        }
        self.item_in_range = None;

        if let (Some(material), Some(item)) =
            (self.item_material.take(), ctx.world.get_entity_mut(contact.entity))
        {
            item.set_material(material);
        }
        if let Some(prompt) = self.prompt {
            ctx.ui.set_text(prompt, "");
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
