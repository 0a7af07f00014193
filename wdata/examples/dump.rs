use std::path::PathBuf;

use wdata::{Document, EventBoxKind};

fn main() {
    env_logger::init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let mut positional = Vec::<String>::new();
    let mut verify = false;

    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--verify" => {
                verify = true;
                i += 1;
            }
            other => {
                positional.push(other.to_string());
                i += 1;
            }
        }
    }

    let path = positional
        .first()
        .map(PathBuf::from)
        .expect("usage: dump <file.wdata> [--verify]");

    let bytes = std::fs::read(&path).expect("read wdata");
    let doc = Document::from_bytes(&bytes).expect("parse wdata");

    println!("{}: {} ({} bytes)", path.display(), doc.version, bytes.len());
    println!(
        "  section versions: event_box={} ani_bg={} item_box={} gimmick={}",
        doc.event_box_version.0,
        doc.ani_bg_version.0,
        doc.item_box_version.0,
        doc.gimmick_version.0
    );
    for (label, value) in [
        ("model", &doc.model_path),
        ("navmesh", &doc.navmesh_path),
        ("navheight", &doc.navheight_path),
        ("event_box", &doc.event_box_path),
        ("obstacle", &doc.obstacle_path),
        ("moc", &doc.moc_path),
        ("ani_bg", &doc.ani_bg_path),
    ] {
        if !value.is_empty() {
            println!("  {label}: {value}");
        }
    }

    println!("  event boxes: {}", doc.event_boxes.total());
    for (slot, group) in doc.event_boxes.iter().enumerate() {
        if group.is_empty() {
            continue;
        }
        let kind = EventBoxKind::from_id(slot as i32).expect("known group");
        println!("    {kind:?}: {}", group.len());
    }
    println!("  ani bgs: {}", doc.ani_bgs.len());
    println!("  item boxes: {}", doc.item_boxes.len());
    println!("  gimmicks: {}", doc.gimmicks.len());
    println!(
        "  triggers: {} (main script {:?})",
        doc.trigger_root.triggers.len(),
        doc.trigger_root.main_script
    );
    println!("  scenes: {}", doc.scenes.len());
    for scene in &doc.scenes {
        println!(
            "    {:?}: fade {}/{}, {} linked, {} resource refs",
            scene.name,
            scene.fade_in_time,
            scene.fade_out_time,
            scene.linked_scenes.len(),
            scene.resource_indices.len()
        );
    }
    println!("  scene resources: {}", doc.scene_resources.len());

    if verify {
        let reencoded = doc.to_bytes().expect("encode wdata");
        if reencoded == bytes {
            println!("round trip: byte identical");
        } else {
            let redecoded = Document::from_bytes(&reencoded).expect("parse re-encoded wdata");
            assert_eq!(redecoded, doc, "re-encoded file decodes differently");
            println!(
                "round trip: normalized {} -> {} bytes, model preserved",
                bytes.len(),
                reencoded.len()
            );
        }
    }
}
