use glam::{Quat, Vec3};

use crate::version::{
    AniBgVersion, EventBoxVersion, FormatVersion, GimmickVersion, ItemBoxVersion,
};

/// Oriented bounding box, the placement record every world object starts
/// with on the wire.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Obb {
    pub name: String,
    pub position: Vec3,
    pub scale: Vec3,
    pub rotation: Quat,
    pub extents: Vec3,
}

impl Default for Obb {
    fn default() -> Self {
        Obb {
            name: String::new(),
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: Quat::IDENTITY,
            extents: Vec3::ONE,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventBoxKind {
    Area,
    Respawn,
    Camera,
    Trigger,
    Waypoint,
    Sound,
    Message,
    Portal,
    Treasure,
    Shop,
    Effect,
    Ladder,
    Guide,
    Push,
    Timer,
    Switch,
    Fishing,
    Water,
}

impl EventBoxKind {
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            0 => Some(Self::Area),
            1 => Some(Self::Respawn),
            2 => Some(Self::Camera),
            3 => Some(Self::Trigger),
            4 => Some(Self::Waypoint),
            5 => Some(Self::Sound),
            6 => Some(Self::Message),
            7 => Some(Self::Portal),
            8 => Some(Self::Treasure),
            9 => Some(Self::Shop),
            10 => Some(Self::Effect),
            11 => Some(Self::Ladder),
            12 => Some(Self::Guide),
            13 => Some(Self::Push),
            15 => Some(Self::Timer),
            16 => Some(Self::Switch),
            17 => Some(Self::Fishing),
            18 => Some(Self::Water),
            _ => None,
        }
    }

    pub fn id(self) -> i32 {
        match self {
            Self::Area => 0,
            Self::Respawn => 1,
            Self::Camera => 2,
            Self::Trigger => 3,
            Self::Waypoint => 4,
            Self::Sound => 5,
            Self::Message => 6,
            Self::Portal => 7,
            Self::Treasure => 8,
            Self::Shop => 9,
            Self::Effect => 10,
            Self::Ladder => 11,
            Self::Guide => 12,
            Self::Push => 13,
            Self::Timer => 15,
            Self::Switch => 16,
            Self::Fishing => 17,
            Self::Water => 18,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaBox {
    pub area_no: i32,
    pub area_name: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RespawnBox {
    pub total_enemy_num: i32,
    pub enemy_num: i32,
    pub enemy_name: String,
    pub respawn_time: f32,
    pub easy: bool,
    pub normal: bool,
    pub hard: bool,
    pub very_hard: bool,
    pub nightmare: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraBox {
    /// Up to [`CameraBox::SLOT_COUNT`] entries; the file always stores the
    /// full set, so encode pads missing slots with defaults.
    pub camera_infos: Vec<CameraInfo>,
}

impl CameraBox {
    pub const SLOT_COUNT: usize = 4;
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraInfo {
    pub target_name: String,
    pub fov: f32,
    /// View-frustum block, stored verbatim.
    pub frustum: [f32; 14],
    pub build_pvs: bool,
    pub draw_ani_bgs: Vec<GroupVisibilityRef>,
    pub hide_ani_bgs: Vec<GroupVisibilityRef>,
    pub draw_items: Vec<GroupVisibilityRef>,
    pub hide_items: Vec<GroupVisibilityRef>,
    pub draw_gimmicks: Vec<GroupVisibilityRef>,
    pub hide_gimmicks: Vec<GroupVisibilityRef>,
    pub hide_event_boxes: Vec<VisibilityRef>,
    pub draw_scenes: Vec<i32>,
    pub hide_scenes: Vec<i32>,
    pub draw_effects: Vec<VisibilityRef>,
    pub hide_effects: Vec<VisibilityRef>,
}

/// Reference to another world object by id, with a display name on newer
/// event box versions.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisibilityRef {
    pub id: i32,
    pub name: String,
}

/// Reference into a grouped section. `group_no` is stored only on files
/// carrying visibility group ids and reads back 0 otherwise.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupVisibilityRef {
    pub group_no: i32,
    pub id: i32,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerBox {
    pub event_name: String,
    pub enabled: bool,
    pub signpost_text_no: i32,
    pub reposition: Vec3,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaypointBox {
    /// Parallel to `link_distances`; the two must stay the same length.
    pub link_ids: Vec<i32>,
    pub link_distances: Vec<f32>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoundBox {
    pub sound_path: String,
    pub volume: f32,
    pub range: f32,
    pub looped: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MessageBox {
    pub message_no: i32,
    pub display_time: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortalBox {
    pub dest_stage_no: i32,
    pub dest_position: Vec3,
    pub dest_yaw: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreasureBox {
    pub treasure_no: i32,
    pub rank: i32,
    pub respawn: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShopBox {
    pub shop_no: i32,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectBox {
    pub effect_path: String,
    pub effect_scale: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LadderBox {
    pub height: f32,
    pub yaw: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuideBox {
    pub guide_text_no: i32,
    pub icon_no: i32,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PushBox {
    pub strength: f32,
    pub direction: Vec3,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimerBox {
    pub duration: f32,
    pub timeout_event: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwitchBox {
    pub switch_no: i32,
    pub default_on: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FishingBox {
    pub table_no: i32,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WaterBox {
    pub depth: f32,
    pub flow: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventBoxPayload {
    Area(AreaBox),
    Respawn(RespawnBox),
    Camera(CameraBox),
    Trigger(TriggerBox),
    Waypoint(WaypointBox),
    Sound(SoundBox),
    Message(MessageBox),
    Portal(PortalBox),
    Treasure(TreasureBox),
    Shop(ShopBox),
    Effect(EffectBox),
    Ladder(LadderBox),
    Guide(GuideBox),
    Push(PushBox),
    Timer(TimerBox),
    Switch(SwitchBox),
    Fishing(FishingBox),
    Water(WaterBox),
}

impl EventBoxPayload {
    pub fn kind(&self) -> EventBoxKind {
        match self {
            EventBoxPayload::Area(_) => EventBoxKind::Area,
            EventBoxPayload::Respawn(_) => EventBoxKind::Respawn,
            EventBoxPayload::Camera(_) => EventBoxKind::Camera,
            EventBoxPayload::Trigger(_) => EventBoxKind::Trigger,
            EventBoxPayload::Waypoint(_) => EventBoxKind::Waypoint,
            EventBoxPayload::Sound(_) => EventBoxKind::Sound,
            EventBoxPayload::Message(_) => EventBoxKind::Message,
            EventBoxPayload::Portal(_) => EventBoxKind::Portal,
            EventBoxPayload::Treasure(_) => EventBoxKind::Treasure,
            EventBoxPayload::Shop(_) => EventBoxKind::Shop,
            EventBoxPayload::Effect(_) => EventBoxKind::Effect,
            EventBoxPayload::Ladder(_) => EventBoxKind::Ladder,
            EventBoxPayload::Guide(_) => EventBoxKind::Guide,
            EventBoxPayload::Push(_) => EventBoxKind::Push,
            EventBoxPayload::Timer(_) => EventBoxKind::Timer,
            EventBoxPayload::Switch(_) => EventBoxKind::Switch,
            EventBoxPayload::Fishing(_) => EventBoxKind::Fishing,
            EventBoxPayload::Water(_) => EventBoxKind::Water,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventBox {
    pub obb: Obb,
    pub payload: EventBoxPayload,
}

/// The fixed set of event box groups, one slot per kind id.
///
/// Slot [`EventBoxGroups::RESERVED_SLOT`] has no kind and must stay empty;
/// its table entry is still written so the slot layout never shifts.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventBoxGroups {
    groups: [Vec<EventBox>; Self::SLOT_COUNT],
}

impl EventBoxGroups {
    pub const SLOT_COUNT: usize = 19;
    pub const RESERVED_SLOT: usize = 14;

    pub fn group(&self, kind: EventBoxKind) -> &[EventBox] {
        &self.groups[kind.id() as usize]
    }

    pub fn group_mut(&mut self, kind: EventBoxKind) -> &mut Vec<EventBox> {
        &mut self.groups[kind.id() as usize]
    }

    /// Append a box to the group matching its payload kind.
    pub fn push(&mut self, event_box: EventBox) {
        let kind = event_box.payload.kind();
        self.group_mut(kind).push(event_box);
    }

    pub fn iter(&self) -> impl Iterator<Item = &[EventBox]> + '_ {
        self.groups.iter().map(Vec::as_slice)
    }

    pub fn total(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(Vec::is_empty)
    }

    pub(crate) fn slot(&self, slot: usize) -> &[EventBox] {
        &self.groups[slot]
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AniBg {
    pub obb: Obb,
    pub anim_no: i32,
    pub cast_shadow: bool,
    pub move_weight: bool,
    pub pvs_radius: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemBox {
    pub obb: Obb,
    pub item_no: i32,
    pub num: i32,
    pub open_enabled: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gimmick {
    pub obb: Obb,
    pub gimmick_no: i32,
    pub script: String,
    pub reset_time: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerRoot {
    pub main_script: String,
    pub triggers: Vec<Trigger>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trigger {
    pub name: String,
    pub comment: String,
    pub events: Vec<String>,
    pub conditions: Vec<String>,
    pub actions: Vec<String>,
}

/// One cinematic scene. Scenes are identified by their index in
/// [`Document::scenes`]; the detail fields below the camera block are only
/// stored on files with the second scene pass.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scene {
    pub fade_in_time: f32,
    pub fade_out_time: f32,
    pub grade_category: i32,
    pub grading: [f32; 6],
    pub camera_position: Vec3,
    pub camera_rotation: Quat,
    pub camera_fov: f32,
    pub camera_aspect: f32,
    pub name: String,
    pub linked_scenes: Vec<i32>,
    /// Indices into [`Document::scene_resources`].
    pub resource_indices: Vec<i32>,
    pub draw_ani_bgs: Vec<GroupVisibilityRef>,
    pub hide_ani_bgs: Vec<GroupVisibilityRef>,
    pub draw_items: Vec<GroupVisibilityRef>,
    pub hide_items: Vec<GroupVisibilityRef>,
    pub draw_gimmicks: Vec<GroupVisibilityRef>,
    pub hide_gimmicks: Vec<GroupVisibilityRef>,
    pub draw_effects: Vec<VisibilityRef>,
    pub hide_effects: Vec<VisibilityRef>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneResource {
    pub key: String,
    pub aliases: Vec<String>,
    pub paths: Vec<ScenePath>,
    /// Crossfade seconds between adjacent path entries; always one shorter
    /// than `paths` (empty when `paths` has at most one entry).
    pub blend_times: Vec<f32>,
    pub cues: Vec<SceneCue>,
    pub sounds: Vec<SceneSound>,
    pub ambients: Vec<SceneAmbient>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScenePath {
    pub model: String,
    pub motion: String,
    pub name: String,
    pub event_name: String,
    pub time: i32,
    pub hold: i32,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneCue {
    pub name: String,
    pub time: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneSound {
    pub path: String,
    pub volume: f32,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneAmbient {
    pub path: String,
    pub volume: f32,
    pub range: f32,
}

/// A fully decoded WDATA file.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    pub version: FormatVersion,
    pub event_box_version: EventBoxVersion,
    pub ani_bg_version: AniBgVersion,
    pub item_box_version: ItemBoxVersion,
    pub gimmick_version: GimmickVersion,
    pub model_path: String,
    pub navmesh_path: String,
    pub navheight_path: String,
    pub event_box_path: String,
    pub obstacle_path: String,
    pub moc_path: String,
    pub ani_bg_path: String,
    pub event_boxes: EventBoxGroups,
    pub ani_bgs: Vec<AniBg>,
    pub item_boxes: Vec<ItemBox>,
    pub gimmicks: Vec<Gimmick>,
    pub trigger_root: TriggerRoot,
    pub scenes: Vec<Scene>,
    pub scene_resources: Vec<SceneResource>,
}

impl Document {
    /// Empty document at the given format version. Section versions default
    /// to 0; callers targeting newer layouts set them explicitly or start
    /// from [`Document::latest`].
    pub fn new(version: FormatVersion) -> Self {
        Document {
            version,
            ..Document::default()
        }
    }

    /// Empty document at the newest format and section versions this crate
    /// writes.
    pub fn latest() -> Self {
        Document {
            version: FormatVersion(crate::version::WDATA_VERSION_LATEST),
            event_box_version: EventBoxVersion(crate::version::EVENT_BOX_VERSION_LATEST),
            ani_bg_version: AniBgVersion(crate::version::ANI_BG_VERSION_LATEST),
            item_box_version: ItemBoxVersion(crate::version::ITEM_BOX_VERSION_LATEST),
            gimmick_version: GimmickVersion(crate::version::GIMMICK_VERSION_LATEST),
            ..Document::default()
        }
    }
}
