//! Encoder producing WDATA byte buffers.
//!
//! Field order and version gates mirror the decoder exactly. The event box
//! offset table is written as placeholders first and patched once every
//! body has landed and its absolute offset is known.

use glam::{Quat, Vec3};

use crate::cursor::Writer;
use crate::{
    AniBg, AniBgVersion, CameraBox, CameraInfo, Document, Error, EventBox, EventBoxGroups,
    EventBoxKind, EventBoxPayload, EventBoxVersion, FormatVersion, Gimmick, GimmickVersion,
    GroupVisibilityRef, ItemBox, ItemBoxVersion, Obb, Result, Scene, SceneResource, TriggerRoot,
    VisibilityRef, WDATA_MAGIC,
};

impl Document {
    /// Encode the document as a WDATA byte buffer.
    ///
    /// Fails with [`Error::InvalidArgument`] when the document violates a
    /// structural rule of the format (mismatched parallel arrays, boxes in
    /// the reserved group, more camera infos than the file can hold).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut w = Writer::new();

        w.write_string(WDATA_MAGIC, false)?;
        w.write_i32(self.version.0);

        if self.version.has_event_box_version() {
            w.write_i32(self.event_box_version.0);
        }
        if self.version.has_ani_bg_version() {
            w.write_i32(self.ani_bg_version.0);
        }
        if self.version.has_item_box_version() {
            w.write_i32(self.item_box_version.0);
        }
        if self.version.has_gimmick_version() {
            w.write_i32(self.gimmick_version.0);
        }

        if self.version.has_reserved_a() {
            w.write_i32(0);
        }
        if self.version.has_reserved_b() {
            w.write_i32(0);
        }

        w.write_string(&self.model_path, true)?;
        w.write_string(&self.navmesh_path, true)?;
        if self.version.has_navheight_path() {
            w.write_string(&self.navheight_path, true)?;
        }
        w.write_string(&self.event_box_path, true)?;
        if self.version.has_obstacle_path() {
            w.write_string(&self.obstacle_path, true)?;
        }

        write_event_box_groups(&mut w, self)?;
        write_ani_bgs(&mut w, &self.ani_bgs, self.ani_bg_version)?;
        write_item_boxes(&mut w, &self.item_boxes, self.item_box_version)?;
        write_gimmicks(&mut w, &self.gimmicks, self.gimmick_version)?;

        if self.version.has_moc_path() {
            w.write_string(&self.moc_path, true)?;
        }
        if self.version.has_ani_bg_path() {
            w.write_string(&self.ani_bg_path, true)?;
        }

        write_trigger_root(&mut w, &self.trigger_root, self.version)?;
        write_scenes(&mut w, &self.scenes, self.version)?;
        write_scene_resources(&mut w, &self.scene_resources, self.version)?;

        let bytes = w.into_bytes();
        log::debug!("encoded WDATA {} into {} bytes", self.version, bytes.len());
        Ok(bytes)
    }
}

fn write_vec3(w: &mut Writer, value: Vec3) {
    w.write_f32(value.x);
    w.write_f32(value.y);
    w.write_f32(value.z);
}

fn write_quat(w: &mut Writer, value: Quat) {
    w.write_f32(value.x);
    w.write_f32(value.y);
    w.write_f32(value.z);
    w.write_f32(value.w);
}

fn write_obb(w: &mut Writer, obb: &Obb) -> Result<()> {
    w.write_string(&obb.name, false)?;
    write_vec3(w, obb.position);
    write_vec3(w, obb.scale);
    write_quat(w, obb.rotation);
    write_vec3(w, obb.extents);
    Ok(())
}

fn write_id_list(w: &mut Writer, ids: &[i32]) {
    w.write_i32(ids.len() as i32);
    for id in ids {
        w.write_i32(*id);
    }
}

fn write_string_list(w: &mut Writer, values: &[String]) -> Result<()> {
    w.write_i32(values.len() as i32);
    for value in values {
        w.write_string(value, false)?;
    }
    Ok(())
}

fn write_visibility_refs(w: &mut Writer, refs: &[VisibilityRef]) -> Result<()> {
    w.write_i32(refs.len() as i32);
    for vis in refs {
        w.write_i32(vis.id);
        w.write_string(&vis.name, false)?;
    }
    Ok(())
}

fn write_group_visibility_refs(
    w: &mut Writer,
    refs: &[GroupVisibilityRef],
    version: FormatVersion,
) -> Result<()> {
    w.write_i32(refs.len() as i32);
    for vis in refs {
        if version.has_visibility_group_ids() {
            w.write_i32(vis.group_no);
        }
        w.write_i32(vis.id);
        w.write_string(&vis.name, false)?;
    }
    Ok(())
}

fn write_hidden_event_refs(
    w: &mut Writer,
    refs: &[VisibilityRef],
    ebv: EventBoxVersion,
) -> Result<()> {
    w.write_i32(refs.len() as i32);
    for vis in refs {
        w.write_i32(vis.id);
        if ebv.has_named_hidden_event_refs() {
            w.write_string(&vis.name, false)?;
        }
    }
    Ok(())
}

fn write_event_box_groups(w: &mut Writer, doc: &Document) -> Result<()> {
    w.write_i32(EventBoxGroups::SLOT_COUNT as i32);
    let table_pos = w.position();
    for _ in 0..EventBoxGroups::SLOT_COUNT {
        w.write_i32(0);
        w.write_i32(0);
        w.write_i32(0);
    }

    for slot in 0..EventBoxGroups::SLOT_COUNT {
        let offset = w.position();
        let count = match EventBoxKind::from_id(slot as i32) {
            Some(kind) => {
                let group = doc.event_boxes.group(kind);
                for event_box in group {
                    if event_box.payload.kind() != kind {
                        return Err(Error::InvalidArgument {
                            message: format!(
                                "{:?} payload stored in the {:?} group",
                                event_box.payload.kind(),
                                kind
                            ),
                        });
                    }
                    write_event_box(w, event_box, doc.version, doc.event_box_version)?;
                }
                group.len()
            }
            None => {
                if !doc.event_boxes.slot(slot).is_empty() {
                    return Err(Error::InvalidArgument {
                        message: format!("event box group {slot} is reserved and must stay empty"),
                    });
                }
                0
            }
        };
        let entry = table_pos + slot * 12;
        w.patch_i32(entry, slot as i32);
        w.patch_i32(entry + 4, offset as i32);
        w.patch_i32(entry + 8, count as i32);
    }
    Ok(())
}

fn write_event_box(
    w: &mut Writer,
    event_box: &EventBox,
    version: FormatVersion,
    ebv: EventBoxVersion,
) -> Result<()> {
    write_obb(w, &event_box.obb)?;
    match &event_box.payload {
        EventBoxPayload::Area(area) => {
            w.write_i32(area.area_no);
            if ebv.has_area_names() {
                w.write_string(&area.area_name, false)?;
            }
        }
        EventBoxPayload::Respawn(respawn) => {
            w.write_i32(respawn.total_enemy_num);
            w.write_i32(respawn.enemy_num);
            w.write_string(&respawn.enemy_name, false)?;
            w.write_f32(respawn.respawn_time);
            w.write_bool(respawn.easy);
            w.write_bool(respawn.normal);
            w.write_bool(respawn.hard);
            w.write_bool(respawn.very_hard);
            w.write_bool(respawn.nightmare);
        }
        EventBoxPayload::Camera(camera) => write_camera_box(w, camera, version, ebv)?,
        EventBoxPayload::Trigger(trigger) => {
            w.write_string(&trigger.event_name, false)?;
            w.write_bool(trigger.enabled);
            if ebv.has_signpost() {
                w.write_i32(trigger.signpost_text_no);
                write_vec3(w, trigger.reposition);
            }
        }
        EventBoxPayload::Waypoint(waypoint) => {
            if waypoint.link_ids.len() != waypoint.link_distances.len() {
                return Err(Error::InvalidArgument {
                    message: format!(
                        "waypoint has {} link ids but {} link distances",
                        waypoint.link_ids.len(),
                        waypoint.link_distances.len()
                    ),
                });
            }
            w.write_i32(waypoint.link_ids.len() as i32);
            for id in &waypoint.link_ids {
                w.write_i32(*id);
            }
            for distance in &waypoint.link_distances {
                w.write_f32(*distance);
            }
        }
        EventBoxPayload::Sound(sound) => {
            w.write_string(&sound.sound_path, true)?;
            w.write_f32(sound.volume);
            w.write_f32(sound.range);
            if ebv.has_sound_loop() {
                w.write_bool(sound.looped);
            }
        }
        EventBoxPayload::Message(message) => {
            w.write_i32(message.message_no);
            w.write_f32(message.display_time);
        }
        EventBoxPayload::Portal(portal) => {
            w.write_i32(portal.dest_stage_no);
            write_vec3(w, portal.dest_position);
            w.write_f32(portal.dest_yaw);
        }
        EventBoxPayload::Treasure(treasure) => {
            w.write_i32(treasure.treasure_no);
            w.write_i32(treasure.rank);
            if ebv.has_treasure_respawn() {
                w.write_bool(treasure.respawn);
            }
        }
        EventBoxPayload::Shop(shop) => {
            w.write_i32(shop.shop_no);
        }
        EventBoxPayload::Effect(effect) => {
            w.write_string(&effect.effect_path, true)?;
            w.write_f32(effect.effect_scale);
        }
        EventBoxPayload::Ladder(ladder) => {
            w.write_f32(ladder.height);
            w.write_f32(ladder.yaw);
        }
        EventBoxPayload::Guide(guide) => {
            w.write_i32(guide.guide_text_no);
            w.write_i32(guide.icon_no);
        }
        EventBoxPayload::Push(push) => {
            w.write_f32(push.strength);
            write_vec3(w, push.direction);
        }
        EventBoxPayload::Timer(timer) => {
            w.write_f32(timer.duration);
            w.write_string(&timer.timeout_event, false)?;
        }
        EventBoxPayload::Switch(switch) => {
            w.write_i32(switch.switch_no);
            w.write_bool(switch.default_on);
        }
        EventBoxPayload::Fishing(fishing) => {
            w.write_i32(fishing.table_no);
        }
        EventBoxPayload::Water(water) => {
            w.write_f32(water.depth);
            write_vec3(w, water.flow);
        }
    }
    Ok(())
}

fn write_camera_box(
    w: &mut Writer,
    camera: &CameraBox,
    version: FormatVersion,
    ebv: EventBoxVersion,
) -> Result<()> {
    if camera.camera_infos.len() > CameraBox::SLOT_COUNT {
        return Err(Error::InvalidArgument {
            message: format!(
                "camera box holds {} infos, the file stores at most {}",
                camera.camera_infos.len(),
                CameraBox::SLOT_COUNT
            ),
        });
    }
    // The file always stores the full slot set; missing tail slots go out
    // as defaults.
    let padding = CameraInfo::default();
    for slot in 0..CameraBox::SLOT_COUNT {
        let info = camera.camera_infos.get(slot).unwrap_or(&padding);
        write_camera_info(w, info, slot, version, ebv)?;
    }
    Ok(())
}

fn write_camera_info(
    w: &mut Writer,
    info: &CameraInfo,
    slot: usize,
    version: FormatVersion,
    ebv: EventBoxVersion,
) -> Result<()> {
    if slot == 0 || ebv.camera_targets_on_all_slots() {
        w.write_string(&info.target_name, false)?;
    }
    w.write_f32(info.fov);
    for value in info.frustum {
        w.write_f32(value);
    }
    if ebv.has_pvs_build_flag() {
        w.write_bool(info.build_pvs);
    }
    write_group_visibility_refs(w, &info.draw_ani_bgs, version)?;
    write_group_visibility_refs(w, &info.hide_ani_bgs, version)?;
    write_group_visibility_refs(w, &info.draw_items, version)?;
    write_group_visibility_refs(w, &info.hide_items, version)?;
    write_group_visibility_refs(w, &info.draw_gimmicks, version)?;
    write_group_visibility_refs(w, &info.hide_gimmicks, version)?;
    write_hidden_event_refs(w, &info.hide_event_boxes, ebv)?;
    write_id_list(w, &info.draw_scenes);
    write_id_list(w, &info.hide_scenes);
    if ebv.has_effect_visibility() {
        write_visibility_refs(w, &info.draw_effects)?;
        write_visibility_refs(w, &info.hide_effects)?;
    }
    Ok(())
}

fn write_ani_bgs(w: &mut Writer, ani_bgs: &[AniBg], abv: AniBgVersion) -> Result<()> {
    w.write_i32(ani_bgs.len() as i32);
    for ani_bg in ani_bgs {
        write_obb(w, &ani_bg.obb)?;
        w.write_i32(ani_bg.anim_no);
        if abv.has_cast_shadow() {
            w.write_bool(ani_bg.cast_shadow);
        }
        if abv.has_move_weight() {
            w.write_bool(ani_bg.move_weight);
        }
        if abv.has_pvs_radius() {
            w.write_f32(ani_bg.pvs_radius);
        }
    }
    Ok(())
}

fn write_item_boxes(w: &mut Writer, item_boxes: &[ItemBox], ibv: ItemBoxVersion) -> Result<()> {
    w.write_i32(item_boxes.len() as i32);
    for item_box in item_boxes {
        write_obb(w, &item_box.obb)?;
        w.write_i32(item_box.item_no);
        w.write_i32(item_box.num);
        if ibv.has_open_enabled() {
            w.write_bool(item_box.open_enabled);
        }
    }
    Ok(())
}

fn write_gimmicks(w: &mut Writer, gimmicks: &[Gimmick], gv: GimmickVersion) -> Result<()> {
    w.write_i32(gimmicks.len() as i32);
    for gimmick in gimmicks {
        write_obb(w, &gimmick.obb)?;
        w.write_i32(gimmick.gimmick_no);
        w.write_string(&gimmick.script, false)?;
        if gv.has_reset_time() {
            w.write_f32(gimmick.reset_time);
        }
    }
    Ok(())
}

fn write_trigger_root(w: &mut Writer, root: &TriggerRoot, version: FormatVersion) -> Result<()> {
    // The abandoned leading fields go out normalized: zeros and an empty
    // path.
    w.write_i32(0);
    w.write_i32(0);
    if version.has_trigger_editor_path() {
        w.write_string("", false)?;
    }
    w.write_i32(0);

    w.write_string(&root.main_script, false)?;
    w.write_i32(root.triggers.len() as i32);
    for trigger in &root.triggers {
        w.write_string(&trigger.name, false)?;
        w.write_string(&trigger.comment, false)?;
        write_string_list(w, &trigger.events)?;
        write_string_list(w, &trigger.conditions)?;
        write_string_list(w, &trigger.actions)?;
    }
    Ok(())
}

fn write_scenes(w: &mut Writer, scenes: &[Scene], version: FormatVersion) -> Result<()> {
    w.write_i32(scenes.len() as i32);
    for scene in scenes {
        w.write_f32(scene.fade_in_time);
        w.write_f32(scene.fade_out_time);
        if version.has_scene_grading() {
            w.write_i32(scene.grade_category);
            for value in scene.grading {
                w.write_f32(value);
            }
        }
        if version.has_scene_camera() {
            write_vec3(w, scene.camera_position);
            write_quat(w, scene.camera_rotation);
            w.write_f32(scene.camera_fov);
            w.write_f32(scene.camera_aspect);
        }
    }

    if version.has_scene_detail_pass() {
        for scene in scenes {
            if version.has_scene_names() {
                w.write_string(&scene.name, false)?;
            }
            write_id_list(w, &scene.linked_scenes);
            write_id_list(w, &scene.resource_indices);
            write_group_visibility_refs(w, &scene.draw_ani_bgs, version)?;
            write_group_visibility_refs(w, &scene.hide_ani_bgs, version)?;
            write_group_visibility_refs(w, &scene.draw_items, version)?;
            write_group_visibility_refs(w, &scene.hide_items, version)?;
            write_group_visibility_refs(w, &scene.draw_gimmicks, version)?;
            write_group_visibility_refs(w, &scene.hide_gimmicks, version)?;
            write_visibility_refs(w, &scene.draw_effects)?;
            write_visibility_refs(w, &scene.hide_effects)?;
        }
    }
    Ok(())
}

fn write_scene_resources(
    w: &mut Writer,
    resources: &[SceneResource],
    version: FormatVersion,
) -> Result<()> {
    w.write_i32(resources.len() as i32);
    for resource in resources {
        write_scene_resource(w, resource, version)?;
    }
    Ok(())
}

fn write_scene_resource(
    w: &mut Writer,
    resource: &SceneResource,
    version: FormatVersion,
) -> Result<()> {
    w.write_string(&resource.key, false)?;
    write_string_list(w, &resource.aliases)?;

    let expected_blends = resource.paths.len().saturating_sub(1);
    if resource.blend_times.len() != expected_blends {
        return Err(Error::InvalidArgument {
            message: format!(
                "resource {:?} has {} path entries and {} blend times (need {})",
                resource.key,
                resource.paths.len(),
                resource.blend_times.len(),
                expected_blends
            ),
        });
    }
    w.write_i32(resource.paths.len() as i32);
    for (index, path) in resource.paths.iter().enumerate() {
        if index > 0 {
            w.write_f32(resource.blend_times[index - 1]);
        }
        w.write_string(&path.model, false)?;
        w.write_string(&path.motion, false)?;
        w.write_string(&path.name, false)?;
        w.write_string(&path.event_name, false)?;
        if version.has_scene_path_timing() {
            w.write_i32(path.time);
            w.write_i32(path.hold);
        }
    }

    if version.has_scene_cues() {
        w.write_i32(resource.cues.len() as i32);
        for cue in &resource.cues {
            w.write_string(&cue.name, false)?;
            w.write_f32(cue.time);
        }
    }

    if version.has_scene_sounds() {
        w.write_i32(resource.sounds.len() as i32);
        for sound in &resource.sounds {
            w.write_string(&sound.path, false)?;
            w.write_f32(sound.volume);
        }
        w.write_i32(0);
        w.write_f32(0.0);
        if version.has_scene_sound_padding() {
            w.write_i32(0);
        }
    }

    if version.has_scene_ambients() {
        w.write_i32(resource.ambients.len() as i32);
        for ambient in &resource.ambients {
            w.write_string(&ambient.path, false)?;
            w.write_f32(ambient.volume);
            w.write_f32(ambient.range);
        }
    }
    Ok(())
}
