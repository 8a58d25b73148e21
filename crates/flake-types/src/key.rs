use std::fmt;

use serde::{Deserialize, Serialize};

use crate::identifier::FlakeId;
use crate::namespace::Namespace;

/// The `(class, identifier, namespace)` triple written out when an instance
/// is serialized.
///
/// Replaying a key through construct-or-retrieve yields either the live
/// instance registered under it or a freshly minted one.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReconstructionKey {
    /// Class name of the instance.
    pub class: String,
    /// Identifier within the class and namespace.
    pub identifier: FlakeId,
    /// Namespace the instance is registered in.
    pub namespace: Namespace,
}

impl ReconstructionKey {
    pub fn new(
        class: impl Into<String>,
        identifier: impl Into<FlakeId>,
        namespace: impl Into<Namespace>,
    ) -> Self {
        Self {
            class: class.into(),
            identifier: identifier.into(),
            namespace: namespace.into(),
        }
    }
}

impl fmt::Display for ReconstructionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}/{}]", self.class, self.namespace, self.identifier)
    }
}
