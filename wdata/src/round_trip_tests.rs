use glam::{Quat, Vec3};

use crate::cursor::Writer;
use crate::{
    AniBg, AniBgVersion, AreaBox, CameraBox, CameraInfo, Document, EffectBox, EventBox,
    EventBoxGroups, EventBoxPayload, EventBoxVersion, FishingBox, FormatVersion,
    Gimmick, GimmickVersion, GroupVisibilityRef, GuideBox, ItemBox, ItemBoxVersion, LadderBox,
    MessageBox, Obb, PortalBox, PushBox, RespawnBox, Scene, SceneAmbient, SceneCue, ScenePath,
    SceneResource, SceneSound, ShopBox, SoundBox, SwitchBox, TimerBox, TreasureBox, Trigger,
    TriggerBox, TriggerRoot, VisibilityRef, WaterBox, WaypointBox,
};

fn round_trip(doc: &Document) -> Document {
    let bytes = doc.to_bytes().expect("encode");
    Document::from_bytes(&bytes).expect("decode")
}

fn obb(name: &str, seed: f32) -> Obb {
    Obb {
        name: name.into(),
        position: Vec3::new(seed, seed + 1.0, seed + 2.0),
        scale: Vec3::new(1.0, 2.0, 0.5),
        rotation: Quat::from_xyzw(0.0, 0.7071, 0.0, 0.7071),
        extents: Vec3::new(3.0, 4.0, 5.0),
    }
}

fn boxed(name: &str, seed: f32, payload: EventBoxPayload) -> EventBox {
    EventBox {
        obb: obb(name, seed),
        payload,
    }
}

fn group_refs(v: FormatVersion, seed: i32) -> Vec<GroupVisibilityRef> {
    vec![GroupVisibilityRef {
        group_no: if v.has_visibility_group_ids() { seed } else { 0 },
        id: seed * 10,
        name: format!("ref_{seed}"),
    }]
}

fn plain_refs(seed: i32) -> Vec<VisibilityRef> {
    vec![VisibilityRef {
        id: seed,
        name: format!("fx_{seed}"),
    }]
}

fn hidden_refs(ebv: EventBoxVersion) -> Vec<VisibilityRef> {
    vec![VisibilityRef {
        id: 5,
        name: if ebv.has_named_hidden_event_refs() {
            "hidden_box".into()
        } else {
            String::new()
        },
    }]
}

fn camera_info(v: FormatVersion, ebv: EventBoxVersion, slot: usize) -> CameraInfo {
    let named = slot == 0 || ebv.camera_targets_on_all_slots();
    CameraInfo {
        target_name: if named {
            format!("cam_target_{slot}")
        } else {
            String::new()
        },
        fov: 60.0 + slot as f32,
        frustum: std::array::from_fn(|i| i as f32 * 0.25),
        build_pvs: ebv.has_pvs_build_flag() && slot % 2 == 0,
        draw_ani_bgs: group_refs(v, 11),
        hide_ani_bgs: group_refs(v, 12),
        draw_items: group_refs(v, 13),
        hide_items: Vec::new(),
        draw_gimmicks: group_refs(v, 14),
        hide_gimmicks: Vec::new(),
        hide_event_boxes: hidden_refs(ebv),
        draw_scenes: vec![0, 2],
        hide_scenes: vec![1],
        draw_effects: if ebv.has_effect_visibility() {
            plain_refs(21)
        } else {
            Vec::new()
        },
        hide_effects: if ebv.has_effect_visibility() {
            plain_refs(22)
        } else {
            Vec::new()
        },
    }
}

fn scene(v: FormatVersion, seed: f32) -> Scene {
    let mut scene = Scene {
        fade_in_time: seed,
        fade_out_time: seed * 2.0,
        ..Scene::default()
    };
    if v.has_scene_grading() {
        scene.grade_category = 3;
        scene.grading = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6];
    }
    if v.has_scene_camera() {
        scene.camera_position = Vec3::new(1.0, 2.0, 3.0);
        scene.camera_rotation = Quat::from_xyzw(0.5, 0.5, 0.5, 0.5);
        scene.camera_fov = 45.0;
        scene.camera_aspect = 1.777;
    }
    if v.has_scene_detail_pass() {
        if v.has_scene_names() {
            scene.name = format!("scene_{seed}");
        }
        scene.linked_scenes = vec![1, 2, 3];
        scene.resource_indices = vec![0];
        scene.draw_ani_bgs = group_refs(v, 31);
        scene.hide_ani_bgs = group_refs(v, 32);
        scene.draw_items = group_refs(v, 33);
        scene.hide_items = group_refs(v, 34);
        scene.draw_gimmicks = group_refs(v, 35);
        scene.hide_gimmicks = group_refs(v, 36);
        scene.draw_effects = plain_refs(37);
        scene.hide_effects = plain_refs(38);
    }
    scene
}

fn resource(v: FormatVersion) -> SceneResource {
    let mut resource = SceneResource {
        key: "intro_cast".into(),
        aliases: vec!["hero".into(), "npc_a".into()],
        ..SceneResource::default()
    };
    for index in 0..3i32 {
        resource.paths.push(ScenePath {
            model: format!("models/actor_{index}.mdl"),
            motion: format!("motions/idle_{index}.mot"),
            name: format!("cast_{index}"),
            event_name: String::new(),
            time: if v.has_scene_path_timing() { 30 * index } else { 0 },
            hold: if v.has_scene_path_timing() { index } else { 0 },
        });
    }
    resource.blend_times = vec![0.25, 0.5];
    if v.has_scene_cues() {
        resource.cues = vec![SceneCue {
            name: "hit".into(),
            time: 0.75,
        }];
    }
    if v.has_scene_sounds() {
        resource.sounds = vec![SceneSound {
            path: "se/door".into(),
            volume: 0.8,
        }];
    }
    if v.has_scene_ambients() {
        resource.ambients = vec![SceneAmbient {
            path: "amb/wind".into(),
            volume: 0.6,
            range: 12.0,
        }];
    }
    resource
}

/// A document populating every section with only the state the given
/// versions can carry through a file.
fn ladder_document(
    v: FormatVersion,
    ebv: EventBoxVersion,
    abv: AniBgVersion,
    ibv: ItemBoxVersion,
    gv: GimmickVersion,
) -> Document {
    let mut doc = Document {
        version: v,
        event_box_version: ebv,
        ani_bg_version: abv,
        item_box_version: ibv,
        gimmick_version: gv,
        ..Document::default()
    };
    doc.model_path = "maps/m01/stage.mdl".into();
    doc.event_box_path = "maps/m01/stage.evb".into();
    if v.has_navheight_path() {
        doc.navheight_path = "maps/m01/height.nvh".into();
    }
    if v.has_obstacle_path() {
        doc.obstacle_path = "maps/m01/obstacle.obs".into();
    }
    if v.has_moc_path() {
        doc.moc_path = "maps/m01/stage.moc".into();
    }
    if v.has_ani_bg_path() {
        doc.ani_bg_path = "maps/m01/bg.abg".into();
    }

    doc.event_boxes.push(boxed(
        "area0",
        1.0,
        EventBoxPayload::Area(AreaBox {
            area_no: 1,
            area_name: if ebv.has_area_names() {
                "village".into()
            } else {
                String::new()
            },
        }),
    ));
    doc.event_boxes.push(boxed(
        "respawn0",
        2.0,
        EventBoxPayload::Respawn(RespawnBox {
            total_enemy_num: 10,
            enemy_num: 3,
            enemy_name: "Goblin".into(),
            respawn_time: 30.0,
            easy: true,
            normal: true,
            hard: false,
            very_hard: false,
            nightmare: true,
        }),
    ));
    doc.event_boxes.push(boxed(
        "camera0",
        3.0,
        EventBoxPayload::Camera(CameraBox {
            camera_infos: (0..CameraBox::SLOT_COUNT)
                .map(|slot| camera_info(v, ebv, slot))
                .collect(),
        }),
    ));
    doc.event_boxes.push(boxed(
        "trigger0",
        4.0,
        EventBoxPayload::Trigger(TriggerBox {
            event_name: "ev_gate".into(),
            enabled: true,
            signpost_text_no: if ebv.has_signpost() { 12 } else { 0 },
            reposition: if ebv.has_signpost() {
                Vec3::new(9.0, 0.0, -4.0)
            } else {
                Vec3::ZERO
            },
        }),
    ));
    doc.event_boxes.push(boxed(
        "waypoint0",
        5.0,
        EventBoxPayload::Waypoint(WaypointBox {
            link_ids: vec![10, 11, 12],
            link_distances: vec![1.0, 2.5, 4.0],
        }),
    ));
    doc.event_boxes.push(boxed(
        "sound0",
        6.0,
        EventBoxPayload::Sound(SoundBox {
            sound_path: "se/amb_river".into(),
            volume: 0.9,
            range: 15.0,
            looped: ebv.has_sound_loop(),
        }),
    ));
    doc.event_boxes.push(boxed(
        "message0",
        7.0,
        EventBoxPayload::Message(MessageBox {
            message_no: 501,
            display_time: 4.5,
        }),
    ));
    doc.event_boxes.push(boxed(
        "portal0",
        8.0,
        EventBoxPayload::Portal(PortalBox {
            dest_stage_no: 7,
            dest_position: Vec3::new(0.0, 1.0, 8.0),
            dest_yaw: 180.0,
        }),
    ));
    doc.event_boxes.push(boxed(
        "treasure0",
        9.0,
        EventBoxPayload::Treasure(TreasureBox {
            treasure_no: 42,
            rank: 2,
            respawn: ebv.has_treasure_respawn(),
        }),
    ));
    doc.event_boxes.push(boxed(
        "shop0",
        10.0,
        EventBoxPayload::Shop(ShopBox { shop_no: 3 }),
    ));
    doc.event_boxes.push(boxed(
        "effect0",
        11.0,
        EventBoxPayload::Effect(EffectBox {
            effect_path: "fx/torch".into(),
            effect_scale: 1.25,
        }),
    ));
    doc.event_boxes.push(boxed(
        "ladder0",
        12.0,
        EventBoxPayload::Ladder(LadderBox {
            height: 6.0,
            yaw: 90.0,
        }),
    ));
    doc.event_boxes.push(boxed(
        "guide0",
        13.0,
        EventBoxPayload::Guide(GuideBox {
            guide_text_no: 88,
            icon_no: 2,
        }),
    ));
    doc.event_boxes.push(boxed(
        "push0",
        14.0,
        EventBoxPayload::Push(PushBox {
            strength: 3.5,
            direction: Vec3::new(0.0, 0.0, 1.0),
        }),
    ));
    doc.event_boxes.push(boxed(
        "timer0",
        15.0,
        EventBoxPayload::Timer(TimerBox {
            duration: 20.0,
            timeout_event: "ev_timeout".into(),
        }),
    ));
    doc.event_boxes.push(boxed(
        "switch0",
        16.0,
        EventBoxPayload::Switch(SwitchBox {
            switch_no: 4,
            default_on: true,
        }),
    ));
    doc.event_boxes.push(boxed(
        "fishing0",
        17.0,
        EventBoxPayload::Fishing(FishingBox { table_no: 6 }),
    ));
    doc.event_boxes.push(boxed(
        "water0",
        18.0,
        EventBoxPayload::Water(WaterBox {
            depth: 2.0,
            flow: Vec3::new(0.5, 0.0, -0.5),
        }),
    ));

    doc.ani_bgs = vec![AniBg {
        obb: obb("bg0", 40.0),
        anim_no: 2,
        cast_shadow: abv.has_cast_shadow(),
        move_weight: abv.has_move_weight(),
        pvs_radius: if abv.has_pvs_radius() { 25.0 } else { 0.0 },
    }];
    doc.item_boxes = vec![ItemBox {
        obb: obb("item0", 41.0),
        item_no: 300,
        num: 5,
        open_enabled: ibv.has_open_enabled(),
    }];
    doc.gimmicks = vec![Gimmick {
        obb: obb("gimmick0", 42.0),
        gimmick_no: 9,
        script: "gmk_bridge".into(),
        reset_time: if gv.has_reset_time() { 12.0 } else { 0.0 },
    }];

    doc.trigger_root = TriggerRoot {
        main_script: "stage_main".into(),
        triggers: vec![Trigger {
            name: "t_open_gate".into(),
            comment: "opens the east gate".into(),
            events: vec!["on_enter".into()],
            conditions: vec!["flag_01".into(), "flag_02".into()],
            actions: vec!["gate_open".into()],
        }],
    };

    doc.scenes = vec![scene(v, 1.5), scene(v, 2.5)];
    if v.keeps_scene_resources() {
        doc.scene_resources = vec![resource(v)];
    }
    doc
}

#[test]
fn documents_round_trip_across_the_version_ladder() {
    let ladder = [
        (1, 0, 0, 0, 0),
        (4, 2, 0, 0, 0),
        (9, 5, 3, 2, 1),
        (14, 7, 4, 3, 2),
        (17, 8, 5, 3, 2),
        (19, 9, 5, 3, 2),
        (20, 9, 5, 3, 2),
        (21, 9, 5, 3, 2),
        (22, 9, 5, 3, 2),
    ];
    for (v, ebv, abv, ibv, gv) in ladder {
        let doc = ladder_document(
            FormatVersion(v),
            EventBoxVersion(ebv),
            AniBgVersion(abv),
            ItemBoxVersion(ibv),
            GimmickVersion(gv),
        );
        let decoded = round_trip(&doc);
        assert_eq!(decoded, doc, "round trip at version {v}");
    }
}

#[test]
fn empty_document_round_trips() {
    let doc = Document::new(FormatVersion(1));
    let decoded = round_trip(&doc);
    assert_eq!(decoded, doc);
    assert!(decoded.event_boxes.is_empty());
}

#[test]
fn latest_document_round_trips() {
    let doc = Document::latest();
    assert_eq!(doc.version, FormatVersion(22));
    let decoded = round_trip(&doc);
    assert_eq!(decoded, doc);
}

#[test]
fn resources_below_v17_are_parsed_and_dropped() {
    let mut doc = ladder_document(
        FormatVersion(14),
        EventBoxVersion(7),
        AniBgVersion(4),
        ItemBoxVersion(3),
        GimmickVersion(2),
    );
    doc.scene_resources = vec![resource(FormatVersion(14))];

    let decoded = round_trip(&doc);
    let mut expected = doc.clone();
    expected.scene_resources.clear();
    assert_eq!(decoded, expected);
}

#[test]
fn trigger_reserved_fields_normalize_to_zero() {
    // Hand-built v1 file with junk in the abandoned trigger fields.
    let mut w = Writer::new();
    w.write_string("WDATA", false).unwrap();
    w.write_i32(1);
    w.write_string("", true).unwrap(); // model
    w.write_string("", true).unwrap(); // navmesh
    w.write_string("", true).unwrap(); // event box
    w.write_i32(EventBoxGroups::SLOT_COUNT as i32);
    let body_pos = (w.position() + EventBoxGroups::SLOT_COUNT * 12) as i32;
    for slot in 0..EventBoxGroups::SLOT_COUNT {
        w.write_i32(slot as i32);
        w.write_i32(body_pos);
        w.write_i32(0);
    }
    w.write_i32(0); // ani bgs
    w.write_i32(0); // item boxes
    w.write_i32(0); // gimmicks
    w.write_i32(7); // junk
    w.write_i32(8); // junk
    w.write_i32(9); // junk
    w.write_string("boot", false).unwrap();
    w.write_i32(1);
    w.write_string("t0", false).unwrap();
    w.write_string("", false).unwrap();
    w.write_i32(0); // events
    w.write_i32(0); // conditions
    w.write_i32(0); // actions
    w.write_i32(0); // scenes
    w.write_i32(0); // resources
    let bytes = w.into_bytes();

    let doc = Document::from_bytes(&bytes).expect("decode");
    assert_eq!(doc.trigger_root.main_script, "boot");
    assert_eq!(doc.trigger_root.triggers.len(), 1);
    assert_eq!(doc.trigger_root.triggers[0].name, "t0");

    // Re-encoding normalizes the junk; the document itself is unchanged.
    let reencoded = doc.to_bytes().expect("encode");
    assert_ne!(reencoded, bytes);
    assert_eq!(Document::from_bytes(&reencoded).expect("decode"), doc);
}
