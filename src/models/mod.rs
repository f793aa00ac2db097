pub mod player;
pub mod team;
pub mod validation;

pub use player::{NewPlayer, Player, PlayerDraft, PlayerUpdate, PlayerView, RoleEntry, StatLine};
pub use team::{CreatedTeam, NewTeam, Team, TeamRanking, TeamUpdate};
pub use validation::{Role, ValidationError};
