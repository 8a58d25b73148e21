//! Model types shared by the unit tests of this crate.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::{flake_class, Flake, FlakeClass, FlakeCore, Restorable, Snowflake};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundData {
    pub name: String,
    pub charge: i32,
}

impl CompoundData {
    pub fn new(name: &str, charge: i32) -> Self {
        Self {
            name: name.to_string(),
            charge,
        }
    }
}

/// A metabolite with mutable data.
pub struct Compound {
    core: FlakeCore,
    data: RwLock<CompoundData>,
}

impl Compound {
    pub fn data(&self) -> CompoundData {
        self.data.read().unwrap().clone()
    }

    pub fn set_charge(&self, charge: i32) {
        self.data.write().unwrap().charge = charge;
    }
}

impl Snowflake for Compound {
    type Args = CompoundData;

    fn class() -> &'static FlakeClass<Self> {
        flake_class!(Compound)
    }

    fn create(core: FlakeCore, args: CompoundData) -> Self {
        Self {
            core,
            data: RwLock::new(args),
        }
    }

    fn core(&self) -> &FlakeCore {
        &self.core
    }
}

impl Restorable for Compound {
    type State = CompoundData;

    fn capture(&self) -> CompoundData {
        self.data()
    }

    fn restore(&self, state: CompoundData) {
        *self.data.write().unwrap() = state;
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReactionData {
    pub substrates: Vec<Flake<Compound>>,
    pub reversible: bool,
}

/// A reaction whose state refers to other snowflakes.
pub struct Reaction {
    core: FlakeCore,
    data: RwLock<ReactionData>,
}

impl Reaction {
    pub fn data(&self) -> ReactionData {
        self.data.read().unwrap().clone()
    }
}

impl Snowflake for Reaction {
    type Args = ReactionData;

    fn class() -> &'static FlakeClass<Self> {
        flake_class!(Reaction)
    }

    fn create(core: FlakeCore, args: ReactionData) -> Self {
        Self {
            core,
            data: RwLock::new(args),
        }
    }

    fn core(&self) -> &FlakeCore {
        &self.core
    }
}

impl Restorable for Reaction {
    type State = ReactionData;

    fn capture(&self) -> ReactionData {
        self.data()
    }

    fn restore(&self, state: ReactionData) {
        *self.data.write().unwrap() = state;
    }
}
