/// Which side of a rule fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub enum Direction {
    ClientToServer,
    ServerToClient,
}
