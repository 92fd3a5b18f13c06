use std::fs;

use mc_icons::assets::AssetSnapshot;
use mc_icons::config::IconizeConfig;
use mc_icons::context::AssetContext;
use mc_icons::errors::IconizeError;
use mc_icons::resolution::{Disambiguator, ScriptedChooser};
use mc_icons::rewrite::{KeepUrls, UrlShortener};
use mc_icons::scan::scan_captures;
use mc_icons::session::Session;
use tempfile::TempDir;

const REPO: &str = "https://icons.test/i/";

fn write_assets(dir: &std::path::Path) {
    fs::write(
        dir.join("names.json"),
        r#"{
            "Coal": ["minecraft:coal", "thermalfoundation:material:768"],
            "Iron Ingot": ["minecraft:iron_ingot"],
            "Wool": ["minecraft:wool:0", "minecraft:wool:1", "minecraft:wool:2"],
            "Copper Ingot": ["thermalfoundation:material:128", "ic2:ingot:2"],
            "Say \"Cheese\"": ["cheese:block"]
        }"#,
    )
    .unwrap();
    fs::write(
        dir.join("mods.json"),
        r#"{ "minecraft": "Minecraft", "thermalfoundation": "Thermal Foundation", "ic2": "Industrial Craft 2" }"#,
    )
    .unwrap();
    fs::write(
        dir.join("modpacks.json"),
        r#"{ "e2ee": ["minecraft", "thermalfoundation"] }"#,
    )
    .unwrap();
    fs::write(
        dir.join("items.json"),
        r#"{
            "minecraft": {
                "coal": { "0": { "": "h_coal" } },
                "iron_ingot": { "0": { "": "h_iron" } },
                "wool": {
                    "0": { "": "h_wool0" },
                    "1": { "": "h_wool1" },
                    "2": { "": "h_wool2" }
                }
            },
            "cheese": { "block": { "0": { "": "h_cheese" } } }
        }"#,
    )
    .unwrap();
    fs::write(
        dir.join("images.json"),
        r#"{
            "h_coal": "minecraft/coal__0",
            "h_iron": "minecraft/iron_ingot__0",
            "h_wool0": "minecraft/wool__0",
            "h_wool1": "minecraft/wool__1",
            "h_wool2": "minecraft/wool__2",
            "h_cheese": "cheese/block__0"
        }"#,
    )
    .unwrap();
}

fn session(
    config: IconizeConfig,
    answers: &[Option<usize>],
) -> (TempDir, Session<ScriptedChooser>) {
    let dir = TempDir::new().unwrap();
    write_assets(dir.path());
    let snapshot = AssetSnapshot::load(dir.path()).unwrap();
    let ctx = AssetContext::new(snapshot, config.modpack.clone());
    let disambiguator =
        Disambiguator::new(ScriptedChooser::new(answers.iter().copied()), config.silent);
    (dir, Session::new(ctx, config, disambiguator))
}

fn config() -> IconizeConfig {
    IconizeConfig {
        repo: REPO.to_string(),
        silent: true,
        short: false,
        ..IconizeConfig::default()
    }
}

#[test]
fn test_run_replaces_resolved_captures_in_place() {
    let (_dir, mut session) = session(config(), &[]);
    let doc = "Smelt [Coal] and [Iron Ingot] (3).\nSee [docs](http://x) and - [x] done.";
    let result = session.run_with(doc, &mut KeepUrls).unwrap();

    assert_eq!(
        result.text,
        "Smelt ![](https://icons.test/i/minecraft/coal__0.png \"Coal\") and \
         ![](https://icons.test/i/minecraft/iron_ingot__0.png \"Iron Ingot\").\n\
         See [docs](http://x) and - [x] done."
    );
    assert_eq!(result.captures, 3);
    assert_eq!(result.resolved, 2);
    assert_eq!(result.replaced, 2);
    assert_eq!(result.icons, 2);
    assert!(result.unresolved.is_empty());
}

#[test]
fn test_every_modifier_respects_max_icons() {
    let config = IconizeConfig {
        max: 2,
        ..config()
    };
    let (_dir, mut session) = session(config, &[]);
    let result = session.run_with("[Wool (Every)]", &mut KeepUrls).unwrap();

    assert_eq!(result.icons, 2);
    assert_eq!(
        result.text,
        "![](https://icons.test/i/minecraft/wool__0.png \"Wool\")\
         ![](https://icons.test/i/minecraft/wool__1.png \"Wool\")"
    );
}

#[test]
fn test_unresolved_captures_are_left_alone() {
    let (_dir, mut session) = session(config(), &[]);
    let doc = "[Copper Ingot] and [Wool]";
    let result = session.run_with(doc, &mut KeepUrls).unwrap();

    assert_eq!(result.text, doc);
    assert_eq!(result.replaced, 0);
    assert_eq!(result.unresolved, vec!["Copper Ingot", "Wool"]);
    assert_eq!(
        session.disambiguator().summary_lines(80),
        vec!["[Copper Ingot]  [Wool]"]
    );
}

#[test]
fn test_resolved_capture_without_icon_keeps_text() {
    let config = IconizeConfig {
        silent: false,
        ..config()
    };
    let (_dir, mut session) = session(config, &[Some(0)]);
    let doc = "Cast [Copper Ingot] twice";
    let result = session.run_with(doc, &mut KeepUrls).unwrap();

    assert_eq!(result.resolved, 1);
    assert_eq!(result.replaced, 0);
    assert_eq!(result.text, doc);
}

#[test]
fn test_interactive_choice_is_spliced() {
    let config = IconizeConfig {
        silent: false,
        ..config()
    };
    let (_dir, mut session) = session(config, &[Some(2)]);
    let result = session.run_with("a [Wool] b", &mut KeepUrls).unwrap();

    assert_eq!(
        result.text,
        "a ![](https://icons.test/i/minecraft/wool__2.png \"Wool\") b"
    );
    assert_eq!(session.disambiguator().chooser().asked().len(), 1);
}

#[test]
fn test_title_quotes_are_escaped() {
    let (_dir, mut session) = session(config(), &[]);
    let result = session.run_with("[Say \"Cheese\"]", &mut KeepUrls).unwrap();
    assert_eq!(
        result.text,
        "![](https://icons.test/i/cheese/block__0.png \"Say \\\"Cheese\\\"\")"
    );
}

/// Shortener that is never reachable.
struct Offline;

impl UrlShortener for Offline {
    fn shorten(&mut self, _url: &str) -> mc_icons::errors::Result<String> {
        Err(std::io::Error::new(std::io::ErrorKind::NotConnected, "offline").into())
    }
}

#[test]
fn test_shortener_failure_keeps_long_urls() {
    let config = IconizeConfig {
        silent: false,
        ..config()
    };
    let (_dir, mut session) = session(config, &[Some(1)]);
    let result = session.run_with("[Wool] and [Coal]", &mut Offline).unwrap();

    assert_eq!(
        result.text,
        "![](https://icons.test/i/minecraft/wool__1.png \"Wool\") and \
         ![](https://icons.test/i/minecraft/coal__0.png \"Coal\")"
    );
    assert_eq!(result.icons, 2);
}

#[test]
fn test_unknown_modpack_aborts_before_resolving() {
    let config = IconizeConfig {
        modpack: Some("missing".to_string()),
        ..config()
    };
    let (_dir, mut session) = session(config, &[]);
    assert!(matches!(
        session.run_with("[Coal]", &mut KeepUrls),
        Err(IconizeError::Config { .. })
    ));
    assert!(session.disambiguator().unresolved().is_empty());
}

#[test]
fn test_scan_reports_positions() {
    let doc = "one\n[Coal] (tf) and [Wool]";
    let captures = scan_captures(doc);
    assert_eq!(captures.len(), 2);
    assert_eq!(captures[0].option.as_deref(), Some("tf"));
    assert_eq!(captures[0].line, 2);
    assert_eq!(&doc[captures[0].start..captures[0].end], "[Coal] (tf)");
    assert_eq!(captures[1].capture, "Wool");
}
