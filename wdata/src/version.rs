use std::fmt;

/// Signature string at the start of every WDATA stream.
pub const WDATA_MAGIC: &str = "WDATA";

/// Newest top-level format version this crate reads and writes.
pub const WDATA_VERSION_LATEST: i32 = 22;

/// Newest section versions, matching what current tooling emits.
pub const EVENT_BOX_VERSION_LATEST: i32 = 9;
pub const ANI_BG_VERSION_LATEST: i32 = 5;
pub const ITEM_BOX_VERSION_LATEST: i32 = 3;
pub const GIMMICK_VERSION_LATEST: i32 = 2;

/// Top-level WDATA format version, read from the file header.
///
/// Every later addition to the format is gated on a fixed threshold of this
/// counter or one of the section counters below. Decode and encode must
/// consult the same predicate for a field, otherwise the two sides disagree
/// about the byte layout.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormatVersion(pub i32);

impl FormatVersion {
    /// Header carries the event box section version.
    pub fn has_event_box_version(self) -> bool {
        self.0 >= 4
    }

    /// Header carries the animated background section version.
    pub fn has_ani_bg_version(self) -> bool {
        self.0 >= 6
    }

    /// Header carries the item box section version.
    pub fn has_item_box_version(self) -> bool {
        self.0 >= 7
    }

    /// Header carries the gimmick section version.
    pub fn has_gimmick_version(self) -> bool {
        self.0 >= 9
    }

    /// Header carries a reserved scalar that no known tool consumes.
    pub fn has_reserved_a(self) -> bool {
        self.0 >= 13
    }

    /// Header carries a second reserved scalar.
    pub fn has_reserved_b(self) -> bool {
        self.0 >= 18
    }

    /// Header carries the navigation heightmap path.
    pub fn has_navheight_path(self) -> bool {
        self.0 >= 10
    }

    /// Header carries the obstacle mesh path.
    pub fn has_obstacle_path(self) -> bool {
        self.0 >= 11
    }

    /// An occlusion (moc) path follows the gimmick section.
    pub fn has_moc_path(self) -> bool {
        self.0 >= 12
    }

    /// An animated background set path follows the moc path.
    pub fn has_ani_bg_path(self) -> bool {
        self.0 >= 14
    }

    /// Trigger block carries an abandoned editor path string.
    pub fn has_trigger_editor_path(self) -> bool {
        self.0 >= 16
    }

    /// Scenes carry a grade category and color grading curve.
    pub fn has_scene_grading(self) -> bool {
        self.0 >= 15
    }

    /// Scenes carry a fixed camera pose.
    pub fn has_scene_camera(self) -> bool {
        self.0 >= 19
    }

    /// Scene array is followed by a second per-scene detail pass.
    pub fn has_scene_detail_pass(self) -> bool {
        self.0 >= 20
    }

    /// Scene detail pass starts with a display name.
    pub fn has_scene_names(self) -> bool {
        self.0 >= 21
    }

    /// Visibility references into grouped sections carry a group number.
    pub fn has_visibility_group_ids(self) -> bool {
        self.0 >= 22
    }

    /// Scene resource path entries carry time and hold counters.
    pub fn has_scene_path_timing(self) -> bool {
        self.0 >= 10
    }

    /// Scene resources carry named cue markers.
    pub fn has_scene_cues(self) -> bool {
        self.0 >= 11
    }

    /// Scene resources carry a sound list plus two trailing scalars.
    pub fn has_scene_sounds(self) -> bool {
        self.0 >= 12
    }

    /// Scene resource sound block ends with an extra abandoned scalar.
    pub fn has_scene_sound_padding(self) -> bool {
        (12..=14).contains(&self.0)
    }

    /// Scene resources carry ambient loop entries.
    pub fn has_scene_ambients(self) -> bool {
        self.0 >= 17
    }

    /// Decoded scene resources are retained on the document. Older files
    /// still carry the records but every known tool ignores them, so the
    /// decoder parses and drops them to stay in step with the stream.
    pub fn keeps_scene_resources(self) -> bool {
        self.0 >= 17
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Sub-version of the event box section.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventBoxVersion(pub i32);

impl EventBoxVersion {
    /// Area boxes carry a display name.
    pub fn has_area_names(self) -> bool {
        self.0 >= 2
    }

    /// Every camera slot carries a target name, not just the first.
    pub fn camera_targets_on_all_slots(self) -> bool {
        self.0 >= 3
    }

    /// Sound boxes carry a loop flag.
    pub fn has_sound_loop(self) -> bool {
        self.0 >= 4
    }

    /// Camera slots carry a PVS build flag.
    pub fn has_pvs_build_flag(self) -> bool {
        self.0 >= 5
    }

    /// Hidden event box references carry a name next to the id.
    pub fn has_named_hidden_event_refs(self) -> bool {
        self.0 >= 6
    }

    /// Camera slots end with draw/hide effect reference lists.
    pub fn has_effect_visibility(self) -> bool {
        self.0 >= 8
    }

    /// Treasure boxes carry a respawn flag.
    pub fn has_treasure_respawn(self) -> bool {
        self.0 >= 8
    }

    /// Trigger boxes carry signpost text and a reposition point.
    pub fn has_signpost(self) -> bool {
        self.0 >= 9
    }
}

/// Sub-version of the animated background section.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AniBgVersion(pub i32);

impl AniBgVersion {
    pub fn has_cast_shadow(self) -> bool {
        self.0 >= 3
    }

    pub fn has_move_weight(self) -> bool {
        self.0 >= 4
    }

    pub fn has_pvs_radius(self) -> bool {
        self.0 >= 5
    }
}

/// Sub-version of the item box section.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemBoxVersion(pub i32);

impl ItemBoxVersion {
    pub fn has_open_enabled(self) -> bool {
        self.0 >= 3
    }
}

/// Sub-version of the gimmick section.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GimmickVersion(pub i32);

impl GimmickVersion {
    pub fn has_reset_time(self) -> bool {
        self.0 >= 2
    }
}
