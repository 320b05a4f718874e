//! Static role registry and team factory.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::agents::{CaptureAgent, DefensiveAgent, OffensiveAgent};
use crate::config::AgentConfig;
use crate::error::TeamError;
use crate::game::{AgentIndex, GameView, Team};

/// Roles used when a team does not name its own.
pub const DEFAULT_ROLES: (RoleId, RoleId) = (RoleId::Offensive, RoleId::Defensive);

/// Every role an agent can be created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleId {
    /// Food-seeking attacker.
    Offensive,
    /// Invader-blocking guard.
    Defensive,
}

impl RoleId {
    /// Registered roles, in listing order.
    pub const ALL: [RoleId; 2] = [RoleId::Offensive, RoleId::Defensive];

    /// Canonical agent name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            RoleId::Offensive => "OffensiveAgent",
            RoleId::Defensive => "DefensiveAgent",
        }
    }

    /// One-line description for listings.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            RoleId::Offensive => {
                "eats enemy food, dodges ghosts, banks food after 3 pellets, avoids loops"
            }
            RoleId::Defensive => "guards the home half, chases invaders, hovers near capsules",
        }
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RoleId {
    type Err = TeamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "offensiveagent" | "offensive" | "offense" => Ok(RoleId::Offensive),
            "defensiveagent" | "defensive" | "defense" => Ok(RoleId::Defensive),
            _ => Err(TeamError::UnknownRole(s.to_string())),
        }
    }
}

/// All registered roles.
#[must_use]
pub const fn role_ids() -> &'static [RoleId] {
    &RoleId::ALL
}

/// Name and description of every registered role.
#[must_use]
pub fn describe_roles() -> Vec<(&'static str, &'static str)> {
    role_ids()
        .iter()
        .map(|role| (role.name(), role.description()))
        .collect()
}

/// Tie-break seed of one agent, derived from a match seed.
#[must_use]
pub const fn agent_seed(seed: u64, index: AgentIndex) -> u64 {
    seed ^ (index as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Instantiate one agent of `role` bound to `index`.
#[must_use]
pub fn create_agent<S: GameView + 'static>(
    role: RoleId,
    index: AgentIndex,
    seed: u64,
    config: AgentConfig,
) -> Box<dyn CaptureAgent<S>> {
    match role {
        RoleId::Offensive => Box::new(OffensiveAgent::new(index, seed, config)),
        RoleId::Defensive => Box::new(DefensiveAgent::new(index, seed, config)),
    }
}

/// Build the two agents of one team from role names.
///
/// Each agent gets its own seed derived from `seed` and its index.
///
/// # Errors
///
/// Returns an error if a role name is unknown, an index belongs to the
/// other team, or both indices are equal.
pub fn create_team<S: GameView + 'static>(
    first_index: AgentIndex,
    second_index: AgentIndex,
    is_red: bool,
    first_role: &str,
    second_role: &str,
    seed: u64,
    config: AgentConfig,
) -> Result<[Box<dyn CaptureAgent<S>>; 2], TeamError> {
    let team = if is_red { Team::Red } else { Team::Blue };
    for index in [first_index, second_index] {
        if Team::of_index(index) != team {
            return Err(TeamError::WrongTeam {
                index,
                team: team.name(),
            });
        }
    }
    if first_index == second_index {
        return Err(TeamError::DuplicateIndex(first_index));
    }
    let first: RoleId = first_role.parse()?;
    let second: RoleId = second_role.parse()?;
    Ok([
        create_agent(first, first_index, agent_seed(seed, first_index), config),
        create_agent(second, second_index, agent_seed(seed, second_index), config),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::CaptureState;

    #[test]
    fn test_parse_role_names() {
        assert_eq!("OffensiveAgent".parse::<RoleId>(), Ok(RoleId::Offensive));
        assert_eq!("defense".parse::<RoleId>(), Ok(RoleId::Defensive));
        assert_eq!(
            "SearchAgent".parse::<RoleId>(),
            Err(TeamError::UnknownRole("SearchAgent".into()))
        );
        for role in role_ids() {
            assert_eq!(role.name().parse::<RoleId>(), Ok(*role));
        }
    }

    #[test]
    fn test_describe_roles() {
        let roles = describe_roles();
        assert_eq!(roles.len(), 2);
        assert_eq!(roles[0].0, "OffensiveAgent");
    }

    #[test]
    fn test_create_team() {
        let team = create_team::<CaptureState>(
            0,
            2,
            true,
            "OffensiveAgent",
            "DefensiveAgent",
            9,
            AgentConfig::default(),
        )
        .unwrap();
        assert_eq!(team[0].index(), 0);
        assert_eq!(team[0].role(), RoleId::Offensive);
        assert_eq!(team[1].index(), 2);
        assert_eq!(team[1].role(), RoleId::Defensive);
        assert_eq!(team[1].time_budget().as_millis(), 100);
    }

    #[test]
    fn test_create_team_rejects_bad_input() {
        let config = AgentConfig::default();
        let wrong = create_team::<CaptureState>(0, 1, true, "offense", "defense", 0, config);
        assert_eq!(
            wrong.unwrap_err(),
            TeamError::WrongTeam {
                index: 1,
                team: "red"
            }
        );
        let dup = create_team::<CaptureState>(1, 1, false, "offense", "defense", 0, config);
        assert_eq!(dup.unwrap_err(), TeamError::DuplicateIndex(1));
        let unknown = create_team::<CaptureState>(1, 3, false, "offense", "goalie", 0, config);
        assert_eq!(unknown.unwrap_err(), TeamError::UnknownRole("goalie".into()));
    }

    #[test]
    fn test_agent_seeds_differ() {
        assert_ne!(agent_seed(5, 0), agent_seed(5, 2));
        assert_eq!(agent_seed(5, 1), agent_seed(5, 1));
    }
}
