//! End-to-end properties of the snowflake pattern.
//!
//! Registries are process-wide, and tests run on parallel threads, so every
//! test works in its own namespace and the counter test owns its type.

use std::sync::{Arc, Barrier, RwLock};
use std::thread;

use proptest::prelude::*;
use serde::{Deserialize, Serialize};

use crate::prelude::*;
use crate::{from_snapshot, to_snapshot, SnapshotCodec, SnapshotConfig};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing_subscriber::filter::LevelFilter::DEBUG)
        .try_init();
}

/// Fields shared by every protein type below.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct ProteinData {
    name: String,
    mass_da: u32,
}

fn protein(name: &str, mass_da: u32) -> ProteinData {
    ProteinData {
        name: name.to_string(),
        mass_da,
    }
}

/// Declares a snowflake type over [`ProteinData`].
macro_rules! protein_type {
    ($name:ident) => {
        struct $name {
            core: FlakeCore,
            data: RwLock<ProteinData>,
        }

        impl $name {
            fn data(&self) -> ProteinData {
                self.data.read().unwrap().clone()
            }

            #[allow(dead_code)]
            fn rename(&self, name: &str) {
                self.data.write().unwrap().name = name.to_string();
            }
        }

        impl Snowflake for $name {
            type Args = ProteinData;

            fn class() -> &'static FlakeClass<Self> {
                flake_class!($name)
            }

            fn create(core: FlakeCore, args: ProteinData) -> Self {
                Self {
                    core,
                    data: RwLock::new(args),
                }
            }

            fn core(&self) -> &FlakeCore {
                &self.core
            }
        }

        impl Restorable for $name {
            type State = ProteinData;

            fn capture(&self) -> ProteinData {
                self.data()
            }

            fn restore(&self, state: ProteinData) {
                *self.data.write().unwrap() = state;
            }
        }
    };
}

protein_type!(Enzyme);
protein_type!(Transporter);
protein_type!(Channel);
protein_type!(Fragment);

fn enzyme(ns: &str, id: &str, mass_da: u32) -> Flake<Enzyme> {
    Enzyme::get_or_create(
        Request::named(id).in_namespace(ns),
        protein(id, mass_da),
    )
}

// ---------------------------------------------------------------------------
// Uniqueness
// ---------------------------------------------------------------------------

#[test]
fn uniqueness_ignores_later_arguments() {
    init_tracing();
    let first = enzyme("prop-unique", "pgi", 61_530);
    let second = enzyme("prop-unique", "pgi", 1);

    assert!(Flake::ptr_eq(&first, &second));
    assert_eq!(second.data(), protein("pgi", 61_530));
}

proptest! {
    #[test]
    fn uniqueness_for_any_key(id in "[a-z]{1,8}", first in any::<u32>(), second in any::<u32>()) {
        let request = Request::named(id.as_str()).in_namespace("prop-unique-any");
        let a = Fragment::get_or_create(request.clone(), protein(&id, first));
        let b = Fragment::get_or_create(request, protein(&id, second));
        prop_assert!(Flake::ptr_eq(&a, &b));
        prop_assert_eq!(a.data(), b.data());
    }
}

// ---------------------------------------------------------------------------
// Isolation across types
// ---------------------------------------------------------------------------

#[test]
fn types_sharing_a_shape_have_separate_registries() {
    let ns = "prop-isolation";
    let e = Enzyme::get_or_create(Request::named("x").in_namespace(ns), protein("e", 1));
    let t = Transporter::get_or_create(Request::named("x").in_namespace(ns), protein("t", 2));

    assert_eq!(e.data().name, "e");
    assert_eq!(t.data().name, "t");
    assert_eq!(Enzyme::class().identifiers(ns), vec![FlakeId::from("x")]);
    assert_eq!(Transporter::class().identifiers(ns), vec![FlakeId::from("x")]);

    Enzyme::class().delete(ns, "x").unwrap();
    assert!(!Enzyme::class().contains(ns, "x"));
    assert!(Transporter::class().contains(ns, "x"));
}

// ---------------------------------------------------------------------------
// Namespaces
// ---------------------------------------------------------------------------

#[test]
fn namespaces_partition_and_clear_independently() {
    let a = enzyme("prop-ns1", "x", 1);
    let b = enzyme("prop-ns2", "x", 2);
    assert!(!Flake::ptr_eq(&a, &b));

    assert_eq!(Enzyme::class().clear("prop-ns1"), 1);
    assert!(Enzyme::class().lookup("prop-ns1", "x").is_none());
    let still = Enzyme::class().lookup("prop-ns2", "x").unwrap();
    assert!(Flake::ptr_eq(&still, &b));
}

// ---------------------------------------------------------------------------
// Counter
// ---------------------------------------------------------------------------

#[test]
fn generated_identifiers_are_monotonic() {
    let ids: Vec<String> = (0..5)
        .map(|_| Channel::get_or_create(Request::new(), ProteinData::default()).to_string())
        .collect();
    assert_eq!(
        ids,
        vec!["Channel_0", "Channel_1", "Channel_2", "Channel_3", "Channel_4"]
    );

    let hit = Channel::get_or_create(Request::named("Channel_2"), ProteinData::default());
    assert_eq!(hit.index(), 2);
    assert_eq!(Channel::class().next_index(), 5);
}

// ---------------------------------------------------------------------------
// Serialization
// ---------------------------------------------------------------------------

#[test]
fn restore_into_fresh_registry_applies_snapshot() {
    init_tracing();
    let original = enzyme("prop-fresh", "pfk", 34_842);
    let snapshot = to_snapshot(&original);
    Enzyme::class().delete("prop-fresh", "pfk").unwrap();

    let restored = from_snapshot::<Enzyme>(snapshot.clone()).unwrap();
    assert!(!Flake::ptr_eq(&original, &restored));
    assert_eq!(restored.data(), snapshot.state);
}

#[test]
fn restore_onto_live_instance_keeps_mutations() {
    init_tracing();
    let live = enzyme("prop-live", "pfk", 34_842);
    let stale = to_snapshot(&live);
    live.rename("phosphofructokinase");

    let restored = from_snapshot::<Enzyme>(stale).unwrap();
    assert!(Flake::ptr_eq(&live, &restored));
    assert_eq!(restored.data().name, "phosphofructokinase");
}

#[test]
fn codec_roundtrip_follows_the_same_rules() {
    for config in [SnapshotConfig::json(), SnapshotConfig::binary()] {
        let ns = format!("prop-codec-{:?}", config.format);
        let codec = SnapshotCodec::new(config);
        let live = enzyme(&ns, "pyk", 50_729);
        let bytes = codec.encode(&live).unwrap();

        live.rename("pyruvate kinase");
        let decoded: Flake<Enzyme> = codec.decode(&bytes).unwrap();
        assert!(Flake::ptr_eq(&live, &decoded));
        assert_eq!(decoded.data().name, "pyruvate kinase");

        Enzyme::class().clear(&ns);
        let fresh: Flake<Enzyme> = codec.decode(&bytes).unwrap();
        assert_eq!(fresh.data(), protein("pyk", 50_729));
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_then_recreate_mints_new_instance() {
    let old = enzyme("prop-delete", "eno", 45_655);
    Enzyme::class().delete("prop-delete", "eno").unwrap();

    let new = enzyme("prop-delete", "eno", 1);
    assert!(!Flake::ptr_eq(&old, &new));
    assert!(new.index() > old.index());
    assert_eq!(new.data().mass_da, 1);

    let err = Enzyme::class().delete("prop-delete", "missing").unwrap_err();
    assert!(matches!(err, crate::RegistryError::KeyNotFound { .. }));
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn concurrent_decodes_share_one_instance() {
    let ns = "prop-concurrent-decode";
    let codec = SnapshotCodec::new(SnapshotConfig::binary());
    let bytes = codec.encode(&enzyme(ns, "hk", 102_000)).unwrap();
    Enzyme::class().clear(ns);

    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let codec = codec.clone();
            let bytes = bytes.clone();
            thread::spawn(move || {
                barrier.wait();
                codec.decode::<Enzyme>(&bytes).unwrap()
            })
        })
        .collect();
    let decoded: Vec<Flake<Enzyme>> = handles
        .into_iter()
        .map(|h| h.join().expect("decode thread should not panic"))
        .collect();

    for flake in &decoded[1..] {
        assert!(Flake::ptr_eq(&decoded[0], flake));
    }
    assert_eq!(decoded[0].data(), protein("hk", 102_000));
    assert_eq!(Enzyme::class().identifiers(ns), vec![FlakeId::from("hk")]);
}
