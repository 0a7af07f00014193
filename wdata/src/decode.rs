//! Decoder for WDATA byte buffers.
//!
//! The decoder is IO-free: it operates on an in-memory byte slice. Sections
//! are read in file order except for event box bodies, which are visited in
//! the order their table offsets declare.

use glam::{Quat, Vec3};

use crate::cursor::Cursor;
use crate::{
    AniBg, AniBgVersion, AreaBox, CameraBox, CameraInfo, Document, EffectBox, Error, EventBox,
    EventBoxGroups, EventBoxKind, EventBoxPayload, EventBoxVersion, FishingBox, FormatVersion,
    Gimmick, GimmickVersion, GroupVisibilityRef, GuideBox, ItemBox, ItemBoxVersion, LadderBox,
    MessageBox, Obb, PortalBox, PushBox, RespawnBox, Result, Scene, SceneAmbient, SceneCue,
    ScenePath, SceneResource, SceneSound, ShopBox, SoundBox, SwitchBox, TimerBox, TreasureBox,
    Trigger, TriggerBox, TriggerRoot, VisibilityRef, WaterBox, WaypointBox, WDATA_MAGIC,
};

/// Smallest wire footprint of an OBB record: name count plus 13 floats.
const OBB_WIRE_MIN: usize = 2 + 13 * 4;

impl Document {
    /// Decode a WDATA file from a byte buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Document> {
        let mut cur = Cursor::new(bytes);

        let magic = cur.read_string(false)?;
        if magic != WDATA_MAGIC {
            return Err(Error::InvalidFormat { found: magic });
        }
        let version = FormatVersion(cur.read_i32()?);

        let event_box_version = EventBoxVersion(if version.has_event_box_version() {
            cur.read_i32()?
        } else {
            0
        });
        let ani_bg_version = AniBgVersion(if version.has_ani_bg_version() {
            cur.read_i32()?
        } else {
            0
        });
        let item_box_version = ItemBoxVersion(if version.has_item_box_version() {
            cur.read_i32()?
        } else {
            0
        });
        let gimmick_version = GimmickVersion(if version.has_gimmick_version() {
            cur.read_i32()?
        } else {
            0
        });

        if version.has_reserved_a() {
            let _ = cur.read_i32()?;
        }
        if version.has_reserved_b() {
            let _ = cur.read_i32()?;
        }

        let model_path = cur.read_string(true)?;
        let navmesh_path = cur.read_string(true)?;
        let navheight_path = if version.has_navheight_path() {
            cur.read_string(true)?
        } else {
            String::new()
        };
        let event_box_path = cur.read_string(true)?;
        let obstacle_path = if version.has_obstacle_path() {
            cur.read_string(true)?
        } else {
            String::new()
        };

        let event_boxes = read_event_box_groups(&mut cur, version, event_box_version)?;
        let ani_bgs = read_ani_bgs(&mut cur, ani_bg_version)?;
        let item_boxes = read_item_boxes(&mut cur, item_box_version)?;
        let gimmicks = read_gimmicks(&mut cur, gimmick_version)?;

        let moc_path = if version.has_moc_path() {
            cur.read_string(true)?
        } else {
            String::new()
        };
        let ani_bg_path = if version.has_ani_bg_path() {
            cur.read_string(true)?
        } else {
            String::new()
        };

        let trigger_root = read_trigger_root(&mut cur, version)?;
        let scenes = read_scenes(&mut cur, version)?;
        let scene_resources = read_scene_resources(&mut cur, version)?;

        let doc = Document {
            version,
            event_box_version,
            ani_bg_version,
            item_box_version,
            gimmick_version,
            model_path,
            navmesh_path,
            navheight_path,
            event_box_path,
            obstacle_path,
            moc_path,
            ani_bg_path,
            event_boxes,
            ani_bgs,
            item_boxes,
            gimmicks,
            trigger_root,
            scenes,
            scene_resources,
        };
        log::debug!(
            "decoded WDATA {} ({} bytes): {} event boxes, {} ani bgs, {} item boxes, {} gimmicks, {} triggers, {} scenes, {} resources",
            doc.version,
            cur.position(),
            doc.event_boxes.total(),
            doc.ani_bgs.len(),
            doc.item_boxes.len(),
            doc.gimmicks.len(),
            doc.trigger_root.triggers.len(),
            doc.scenes.len(),
            doc.scene_resources.len(),
        );
        Ok(doc)
    }
}

fn read_vec3(cur: &mut Cursor) -> Result<Vec3> {
    Ok(Vec3::new(cur.read_f32()?, cur.read_f32()?, cur.read_f32()?))
}

fn read_quat(cur: &mut Cursor) -> Result<Quat> {
    Ok(Quat::from_xyzw(
        cur.read_f32()?,
        cur.read_f32()?,
        cur.read_f32()?,
        cur.read_f32()?,
    ))
}

fn read_obb(cur: &mut Cursor) -> Result<Obb> {
    Ok(Obb {
        name: cur.read_string(false)?,
        position: read_vec3(cur)?,
        scale: read_vec3(cur)?,
        rotation: read_quat(cur)?,
        extents: read_vec3(cur)?,
    })
}

fn read_id_list(cur: &mut Cursor) -> Result<Vec<i32>> {
    let count = cur.read_count(4)?;
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        ids.push(cur.read_i32()?);
    }
    Ok(ids)
}

fn read_string_list(cur: &mut Cursor) -> Result<Vec<String>> {
    let count = cur.read_count(2)?;
    let mut strings = Vec::with_capacity(count);
    for _ in 0..count {
        strings.push(cur.read_string(false)?);
    }
    Ok(strings)
}

fn read_visibility_refs(cur: &mut Cursor) -> Result<Vec<VisibilityRef>> {
    let count = cur.read_count(6)?;
    let mut refs = Vec::with_capacity(count);
    for _ in 0..count {
        refs.push(VisibilityRef {
            id: cur.read_i32()?,
            name: cur.read_string(false)?,
        });
    }
    Ok(refs)
}

fn read_group_visibility_refs(
    cur: &mut Cursor,
    version: FormatVersion,
) -> Result<Vec<GroupVisibilityRef>> {
    let grouped = version.has_visibility_group_ids();
    let count = cur.read_count(if grouped { 10 } else { 6 })?;
    let mut refs = Vec::with_capacity(count);
    for _ in 0..count {
        let group_no = if grouped { cur.read_i32()? } else { 0 };
        refs.push(GroupVisibilityRef {
            group_no,
            id: cur.read_i32()?,
            name: cur.read_string(false)?,
        });
    }
    Ok(refs)
}

/// Hidden event box references switch shape with the section version: bare
/// ids on old files, id + name pairs on new ones.
fn read_hidden_event_refs(cur: &mut Cursor, ebv: EventBoxVersion) -> Result<Vec<VisibilityRef>> {
    let named = ebv.has_named_hidden_event_refs();
    let count = cur.read_count(if named { 6 } else { 4 })?;
    let mut refs = Vec::with_capacity(count);
    for _ in 0..count {
        let id = cur.read_i32()?;
        let name = if named {
            cur.read_string(false)?
        } else {
            String::new()
        };
        refs.push(VisibilityRef { id, name });
    }
    Ok(refs)
}

fn read_event_box_groups(
    cur: &mut Cursor,
    version: FormatVersion,
    ebv: EventBoxVersion,
) -> Result<EventBoxGroups> {
    let table_len = cur.read_count(12)?;
    let mut entries: Vec<(EventBoxKind, usize, usize)> = Vec::with_capacity(table_len);
    for _ in 0..table_len {
        let kind_id = cur.read_i32()?;
        let offset = cur.read_i32()? as u32 as usize;
        let count = cur.read_i32()? as u32 as usize;
        match EventBoxKind::from_id(kind_id) {
            Some(kind) => entries.push((kind, offset, count)),
            // The reserved slot still gets a table entry, but a body for it
            // has no decoder, same as any id outside the registry.
            None if kind_id == EventBoxGroups::RESERVED_SLOT as i32 && count == 0 => {}
            None => return Err(Error::UnknownVariant {
                kind: kind_id,
                offset,
            }),
        }
    }

    // Bodies are laid out in offset order, which older writers did not keep
    // aligned with table order. Stable sort, then walk. Empty groups are
    // skipped so the cursor ends up exactly after the last body.
    entries.sort_by_key(|&(_, offset, _)| offset);

    let mut groups = EventBoxGroups::default();
    for (kind, offset, count) in entries {
        if count == 0 {
            continue;
        }
        cur.seek(offset);
        for _ in 0..count {
            let event_box = read_event_box(cur, kind, version, ebv)?;
            groups.group_mut(kind).push(event_box);
        }
    }
    log::trace!("event box table: {} groups, {} boxes", table_len, groups.total());
    Ok(groups)
}

fn read_event_box(
    cur: &mut Cursor,
    kind: EventBoxKind,
    version: FormatVersion,
    ebv: EventBoxVersion,
) -> Result<EventBox> {
    let obb = read_obb(cur)?;
    let payload = match kind {
        EventBoxKind::Area => {
            let area_no = cur.read_i32()?;
            let area_name = if ebv.has_area_names() {
                cur.read_string(false)?
            } else {
                String::new()
            };
            EventBoxPayload::Area(AreaBox { area_no, area_name })
        }
        EventBoxKind::Respawn => EventBoxPayload::Respawn(RespawnBox {
            total_enemy_num: cur.read_i32()?,
            enemy_num: cur.read_i32()?,
            enemy_name: cur.read_string(false)?,
            respawn_time: cur.read_f32()?,
            easy: cur.read_bool()?,
            normal: cur.read_bool()?,
            hard: cur.read_bool()?,
            very_hard: cur.read_bool()?,
            nightmare: cur.read_bool()?,
        }),
        EventBoxKind::Camera => {
            let mut camera_infos = Vec::with_capacity(CameraBox::SLOT_COUNT);
            for slot in 0..CameraBox::SLOT_COUNT {
                camera_infos.push(read_camera_info(cur, slot, version, ebv)?);
            }
            EventBoxPayload::Camera(CameraBox { camera_infos })
        }
        EventBoxKind::Trigger => {
            let event_name = cur.read_string(false)?;
            let enabled = cur.read_bool()?;
            let (signpost_text_no, reposition) = if ebv.has_signpost() {
                (cur.read_i32()?, read_vec3(cur)?)
            } else {
                (0, Vec3::ZERO)
            };
            EventBoxPayload::Trigger(TriggerBox {
                event_name,
                enabled,
                signpost_text_no,
                reposition,
            })
        }
        EventBoxKind::Waypoint => {
            let count = cur.read_count(8)?;
            let mut link_ids = Vec::with_capacity(count);
            for _ in 0..count {
                link_ids.push(cur.read_i32()?);
            }
            let mut link_distances = Vec::with_capacity(count);
            for _ in 0..count {
                link_distances.push(cur.read_f32()?);
            }
            EventBoxPayload::Waypoint(WaypointBox {
                link_ids,
                link_distances,
            })
        }
        EventBoxKind::Sound => {
            let sound_path = cur.read_string(true)?;
            let volume = cur.read_f32()?;
            let range = cur.read_f32()?;
            let looped = if ebv.has_sound_loop() {
                cur.read_bool()?
            } else {
                false
            };
            EventBoxPayload::Sound(SoundBox {
                sound_path,
                volume,
                range,
                looped,
            })
        }
        EventBoxKind::Message => EventBoxPayload::Message(MessageBox {
            message_no: cur.read_i32()?,
            display_time: cur.read_f32()?,
        }),
        EventBoxKind::Portal => EventBoxPayload::Portal(PortalBox {
            dest_stage_no: cur.read_i32()?,
            dest_position: read_vec3(cur)?,
            dest_yaw: cur.read_f32()?,
        }),
        EventBoxKind::Treasure => {
            let treasure_no = cur.read_i32()?;
            let rank = cur.read_i32()?;
            let respawn = if ebv.has_treasure_respawn() {
                cur.read_bool()?
            } else {
                false
            };
            EventBoxPayload::Treasure(TreasureBox {
                treasure_no,
                rank,
                respawn,
            })
        }
        EventBoxKind::Shop => EventBoxPayload::Shop(ShopBox {
            shop_no: cur.read_i32()?,
        }),
        EventBoxKind::Effect => EventBoxPayload::Effect(EffectBox {
            effect_path: cur.read_string(true)?,
            effect_scale: cur.read_f32()?,
        }),
        EventBoxKind::Ladder => EventBoxPayload::Ladder(LadderBox {
            height: cur.read_f32()?,
            yaw: cur.read_f32()?,
        }),
        EventBoxKind::Guide => EventBoxPayload::Guide(GuideBox {
            guide_text_no: cur.read_i32()?,
            icon_no: cur.read_i32()?,
        }),
        EventBoxKind::Push => EventBoxPayload::Push(PushBox {
            strength: cur.read_f32()?,
            direction: read_vec3(cur)?,
        }),
        EventBoxKind::Timer => EventBoxPayload::Timer(TimerBox {
            duration: cur.read_f32()?,
            timeout_event: cur.read_string(false)?,
        }),
        EventBoxKind::Switch => EventBoxPayload::Switch(SwitchBox {
            switch_no: cur.read_i32()?,
            default_on: cur.read_bool()?,
        }),
        EventBoxKind::Fishing => EventBoxPayload::Fishing(FishingBox {
            table_no: cur.read_i32()?,
        }),
        EventBoxKind::Water => EventBoxPayload::Water(WaterBox {
            depth: cur.read_f32()?,
            flow: read_vec3(cur)?,
        }),
    };
    Ok(EventBox { obb, payload })
}

fn read_camera_info(
    cur: &mut Cursor,
    slot: usize,
    version: FormatVersion,
    ebv: EventBoxVersion,
) -> Result<CameraInfo> {
    let target_name = if slot == 0 || ebv.camera_targets_on_all_slots() {
        cur.read_string(false)?
    } else {
        String::new()
    };
    let fov = cur.read_f32()?;
    let mut frustum = [0.0f32; 14];
    for value in &mut frustum {
        *value = cur.read_f32()?;
    }
    let build_pvs = if ebv.has_pvs_build_flag() {
        cur.read_bool()?
    } else {
        false
    };
    let draw_ani_bgs = read_group_visibility_refs(cur, version)?;
    let hide_ani_bgs = read_group_visibility_refs(cur, version)?;
    let draw_items = read_group_visibility_refs(cur, version)?;
    let hide_items = read_group_visibility_refs(cur, version)?;
    let draw_gimmicks = read_group_visibility_refs(cur, version)?;
    let hide_gimmicks = read_group_visibility_refs(cur, version)?;
    let hide_event_boxes = read_hidden_event_refs(cur, ebv)?;
    let draw_scenes = read_id_list(cur)?;
    let hide_scenes = read_id_list(cur)?;
    let (draw_effects, hide_effects) = if ebv.has_effect_visibility() {
        (read_visibility_refs(cur)?, read_visibility_refs(cur)?)
    } else {
        (Vec::new(), Vec::new())
    };
    Ok(CameraInfo {
        target_name,
        fov,
        frustum,
        build_pvs,
        draw_ani_bgs,
        hide_ani_bgs,
        draw_items,
        hide_items,
        draw_gimmicks,
        hide_gimmicks,
        hide_event_boxes,
        draw_scenes,
        hide_scenes,
        draw_effects,
        hide_effects,
    })
}

fn read_ani_bgs(cur: &mut Cursor, abv: AniBgVersion) -> Result<Vec<AniBg>> {
    let count = cur.read_count(OBB_WIRE_MIN + 4)?;
    let mut ani_bgs = Vec::with_capacity(count);
    for _ in 0..count {
        let obb = read_obb(cur)?;
        let anim_no = cur.read_i32()?;
        let cast_shadow = if abv.has_cast_shadow() {
            cur.read_bool()?
        } else {
            false
        };
        let move_weight = if abv.has_move_weight() {
            cur.read_bool()?
        } else {
            false
        };
        let pvs_radius = if abv.has_pvs_radius() {
            cur.read_f32()?
        } else {
            0.0
        };
        ani_bgs.push(AniBg {
            obb,
            anim_no,
            cast_shadow,
            move_weight,
            pvs_radius,
        });
    }
    Ok(ani_bgs)
}

fn read_item_boxes(cur: &mut Cursor, ibv: ItemBoxVersion) -> Result<Vec<ItemBox>> {
    let count = cur.read_count(OBB_WIRE_MIN + 8)?;
    let mut item_boxes = Vec::with_capacity(count);
    for _ in 0..count {
        let obb = read_obb(cur)?;
        let item_no = cur.read_i32()?;
        let num = cur.read_i32()?;
        let open_enabled = if ibv.has_open_enabled() {
            cur.read_bool()?
        } else {
            false
        };
        item_boxes.push(ItemBox {
            obb,
            item_no,
            num,
            open_enabled,
        });
    }
    Ok(item_boxes)
}

fn read_gimmicks(cur: &mut Cursor, gv: GimmickVersion) -> Result<Vec<Gimmick>> {
    let count = cur.read_count(OBB_WIRE_MIN + 6)?;
    let mut gimmicks = Vec::with_capacity(count);
    for _ in 0..count {
        let obb = read_obb(cur)?;
        let gimmick_no = cur.read_i32()?;
        let script = cur.read_string(false)?;
        let reset_time = if gv.has_reset_time() {
            cur.read_f32()?
        } else {
            0.0
        };
        gimmicks.push(Gimmick {
            obb,
            gimmick_no,
            script,
            reset_time,
        });
    }
    Ok(gimmicks)
}

fn read_trigger_root(cur: &mut Cursor, version: FormatVersion) -> Result<TriggerRoot> {
    // Two reserved scalars, an abandoned editor path on newer files, one
    // more reserved scalar. None survive a round trip.
    let _ = cur.read_i32()?;
    let _ = cur.read_i32()?;
    if version.has_trigger_editor_path() {
        let _ = cur.read_string(false)?;
    }
    let _ = cur.read_i32()?;

    let main_script = cur.read_string(false)?;
    let count = cur.read_count(16)?;
    let mut triggers = Vec::with_capacity(count);
    for _ in 0..count {
        triggers.push(Trigger {
            name: cur.read_string(false)?,
            comment: cur.read_string(false)?,
            events: read_string_list(cur)?,
            conditions: read_string_list(cur)?,
            actions: read_string_list(cur)?,
        });
    }
    Ok(TriggerRoot {
        main_script,
        triggers,
    })
}

fn read_scenes(cur: &mut Cursor, version: FormatVersion) -> Result<Vec<Scene>> {
    let count = cur.read_count(8)?;
    let mut scenes = Vec::with_capacity(count);
    for _ in 0..count {
        let mut scene = Scene {
            fade_in_time: cur.read_f32()?,
            fade_out_time: cur.read_f32()?,
            ..Scene::default()
        };
        if version.has_scene_grading() {
            scene.grade_category = cur.read_i32()?;
            for value in &mut scene.grading {
                *value = cur.read_f32()?;
            }
        }
        if version.has_scene_camera() {
            scene.camera_position = read_vec3(cur)?;
            scene.camera_rotation = read_quat(cur)?;
            scene.camera_fov = cur.read_f32()?;
            scene.camera_aspect = cur.read_f32()?;
        }
        scenes.push(scene);
    }

    // Second pass revisits every scene in the same order; the file
    // interleaves nothing between the two passes.
    if version.has_scene_detail_pass() {
        for scene in scenes.iter_mut() {
            if version.has_scene_names() {
                scene.name = cur.read_string(false)?;
            }
            scene.linked_scenes = read_id_list(cur)?;
            scene.resource_indices = read_id_list(cur)?;
            scene.draw_ani_bgs = read_group_visibility_refs(cur, version)?;
            scene.hide_ani_bgs = read_group_visibility_refs(cur, version)?;
            scene.draw_items = read_group_visibility_refs(cur, version)?;
            scene.hide_items = read_group_visibility_refs(cur, version)?;
            scene.draw_gimmicks = read_group_visibility_refs(cur, version)?;
            scene.hide_gimmicks = read_group_visibility_refs(cur, version)?;
            scene.draw_effects = read_visibility_refs(cur)?;
            scene.hide_effects = read_visibility_refs(cur)?;
        }
    }
    Ok(scenes)
}

fn read_scene_resources(cur: &mut Cursor, version: FormatVersion) -> Result<Vec<SceneResource>> {
    let count = cur.read_count(2)?;
    let mut resources = Vec::new();
    for _ in 0..count {
        let resource = read_scene_resource(cur, version)?;
        // Old files carry resource records no tool consumes anymore; they
        // are parsed to keep the stream in step, then dropped.
        if version.keeps_scene_resources() {
            resources.push(resource);
        }
    }
    Ok(resources)
}

fn read_scene_resource(cur: &mut Cursor, version: FormatVersion) -> Result<SceneResource> {
    let key = cur.read_string(false)?;
    let aliases = read_string_list(cur)?;

    let path_count = cur.read_count(8)?;
    let mut paths = Vec::with_capacity(path_count);
    let mut blend_times = Vec::new();
    for index in 0..path_count {
        if index > 0 {
            blend_times.push(cur.read_f32()?);
        }
        let model = cur.read_string(false)?;
        let motion = cur.read_string(false)?;
        let name = cur.read_string(false)?;
        let event_name = cur.read_string(false)?;
        let (time, hold) = if version.has_scene_path_timing() {
            (cur.read_i32()?, cur.read_i32()?)
        } else {
            (0, 0)
        };
        paths.push(ScenePath {
            model,
            motion,
            name,
            event_name,
            time,
            hold,
        });
    }

    let cues = if version.has_scene_cues() {
        let count = cur.read_count(6)?;
        let mut cues = Vec::with_capacity(count);
        for _ in 0..count {
            cues.push(SceneCue {
                name: cur.read_string(false)?,
                time: cur.read_f32()?,
            });
        }
        cues
    } else {
        Vec::new()
    };

    let sounds = if version.has_scene_sounds() {
        let count = cur.read_count(6)?;
        let mut sounds = Vec::with_capacity(count);
        for _ in 0..count {
            sounds.push(SceneSound {
                path: cur.read_string(false)?,
                volume: cur.read_f32()?,
            });
        }
        let _ = cur.read_i32()?;
        let _ = cur.read_f32()?;
        if version.has_scene_sound_padding() {
            let _ = cur.read_i32()?;
        }
        sounds
    } else {
        Vec::new()
    };

    let ambients = if version.has_scene_ambients() {
        let count = cur.read_count(10)?;
        let mut ambients = Vec::with_capacity(count);
        for _ in 0..count {
            ambients.push(SceneAmbient {
                path: cur.read_string(false)?,
                volume: cur.read_f32()?,
                range: cur.read_f32()?,
            });
        }
        ambients
    } else {
        Vec::new()
    };

    Ok(SceneResource {
        key,
        aliases,
        paths,
        blend_times,
        cues,
        sounds,
        ambients,
    })
}
