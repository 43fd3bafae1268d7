// Domain-level rejections for player actions. None of these are fatal.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionError {
    PlayerNotFound,
    PlayerDead,
    BlankName,
    TargetNotFound,
    SelfTarget,
    TargetDead,
    TargetInvulnerable,
    InvalidAmount,
    ObstacleNotFound,
    ObstacleDestroyed,
    DoorNotFound,
    InsufficientScrap { needed: u32, available: u32 },
    BuildingNotFound,
    AlreadyOwner,
    NotOwner,
    HackInProgress,
    PickupNotFound,
    CrateNotFound,
    NoAbility,
    CapturePointNotFound,
    MaxLevel,
    GuardNotFound,
}
