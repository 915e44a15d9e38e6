use rand::Rng;
use rand::seq::SliceRandom;

use crate::dataset::{Dataset, League, Player, Team};

const POSITIONS: &[&str] = &["GK", "CB", "RB", "LB", "DM", "CM", "AM", "RW", "LW", "ST"];
const NATIONS: &[&str] = &[
    "England",
    "Spain",
    "Germany",
    "France",
    "Brazil",
    "Argentina",
    "Portugal",
    "Netherlands",
    "Norway",
    "Nigeria",
];
const FIRST: &[&str] = &["Alex", "Jon", "Mateo", "Luca", "Noah", "Ivan", "Yusuf", "Kai", "Leo"];
const LAST: &[&str] = &["Stone", "Vega", "Holt", "Nox", "Vale", "Rook", "Quinn", "Park", "Moss"];

struct SquadSeed {
    team: &'static str,
    country: &'static str,
    manager: &'static str,
    standing: i64,
    goals_for: i64,
    league: &'static str,
    players: &'static [(&'static str, &'static str, i64, &'static str, i64)],
}

const SQUADS: &[SquadSeed] = &[
    SquadSeed {
        team: "Arsenal",
        country: "England",
        manager: "Mikel Arteta",
        standing: 2,
        goals_for: 69,
        league: "Premier League",
        players: &[
            ("Bukayo Saka", "England", 23, "RW", 58),
            ("Declan Rice", "England", 26, "CM", 31),
            ("Martin Odegaard", "Norway", 26, "AM", 55),
            ("William Saliba", "France", 24, "CB", 6),
        ],
    },
    SquadSeed {
        team: "Liverpool",
        country: "England",
        manager: "Arne Slot",
        standing: 1,
        goals_for: 86,
        league: "Premier League",
        players: &[
            ("Mohamed Salah", "Egypt", 32, "RW", 245),
            ("Virgil van Dijk", "Netherlands", 33, "CB", 48),
            ("Trent Alexander-Arnold", "England", 26, "RB", 23),
        ],
    },
    SquadSeed {
        team: "Chelsea",
        country: "England",
        manager: "Enzo Maresca",
        standing: 4,
        goals_for: 64,
        league: "Premier League",
        players: &[
            ("Cole Palmer", "England", 23, "AM", 47),
            ("Enzo Fernandez", "Argentina", 24, "CM", 21),
        ],
    },
    SquadSeed {
        team: "Manchester City",
        country: "England",
        manager: "Pep Guardiola",
        standing: 3,
        goals_for: 72,
        league: "Premier League",
        players: &[
            ("Erling Haaland", "Norway", 24, "ST", 228),
            ("Phil Foden", "England", 25, "AM", 91),
            ("Rodri", "Spain", 28, "DM", 40),
        ],
    },
    SquadSeed {
        team: "Tottenham",
        country: "England",
        manager: "Ange Postecoglou",
        standing: 17,
        goals_for: 64,
        league: "Premier League",
        players: &[
            ("Son Heung-min", "South Korea", 32, "LW", 173),
            ("James Maddison", "England", 28, "AM", 72),
        ],
    },
    SquadSeed {
        team: "Sunderland",
        country: "England",
        manager: "Regis Le Bris",
        standing: 4,
        goals_for: 58,
        league: "Championship",
        players: &[("Jobe Bellingham", "England", 19, "CM", 6)],
    },
    SquadSeed {
        team: "Luton Town",
        country: "England",
        manager: "Matt Bloomfield",
        standing: 22,
        goals_for: 45,
        league: "Championship",
        players: &[("Carlton Morris", "England", 29, "ST", 64)],
    },
    SquadSeed {
        team: "Barcelona",
        country: "Spain",
        manager: "Hansi Flick",
        standing: 1,
        goals_for: 102,
        league: "La Liga",
        players: &[
            ("Robert Lewandowski", "Poland", 36, "ST", 368),
            ("Lamine Yamal", "Spain", 17, "RW", 18),
            ("Pedri", "Spain", 22, "CM", 27),
        ],
    },
    SquadSeed {
        team: "Real Madrid",
        country: "Spain",
        manager: "Carlo Ancelotti",
        standing: 2,
        goals_for: 78,
        league: "La Liga",
        players: &[
            ("Kylian Mbappe", "France", 26, "ST", 305),
            ("Vinicius Junior", "Brazil", 24, "LW", 96),
            ("Jude Bellingham", "England", 21, "AM", 58),
        ],
    },
    SquadSeed {
        team: "Atletico Madrid",
        country: "Spain",
        manager: "Diego Simeone",
        standing: 3,
        goals_for: 68,
        league: "La Liga",
        players: &[
            ("Antoine Griezmann", "France", 33, "SS", 280),
            ("Julian Alvarez", "Argentina", 25, "ST", 88),
        ],
    },
    SquadSeed {
        team: "Sevilla",
        country: "Spain",
        manager: "Garcia Pimienta",
        standing: 17,
        goals_for: 42,
        league: "La Liga",
        players: &[("Isaac Romero", "Spain", 25, "ST", 14)],
    },
    SquadSeed {
        team: "Bayern Munich",
        country: "Germany",
        manager: "Vincent Kompany",
        standing: 1,
        goals_for: 99,
        league: "Bundesliga",
        players: &[
            ("Harry Kane", "England", 31, "ST", 380),
            ("Jamal Musiala", "Germany", 22, "AM", 55),
            ("Joshua Kimmich", "Germany", 30, "DM", 42),
        ],
    },
    SquadSeed {
        team: "Bayer Leverkusen",
        country: "Germany",
        manager: "Xabi Alonso",
        standing: 2,
        goals_for: 72,
        league: "Bundesliga",
        players: &[
            ("Florian Wirtz", "Germany", 21, "AM", 57),
            ("Granit Xhaka", "Switzerland", 32, "CM", 33),
        ],
    },
    SquadSeed {
        team: "Borussia Dortmund",
        country: "Germany",
        manager: "Niko Kovac",
        standing: 4,
        goals_for: 71,
        league: "Bundesliga",
        players: &[("Serhou Guirassy", "Guinea", 29, "ST", 130)],
    },
];

const LEAGUES: &[(&str, &str, &str)] = &[
    ("Premier League", "Liverpool", "Southampton"),
    ("Championship", "Leeds United", "Plymouth Argyle"),
    ("La Liga", "Barcelona", "Valladolid"),
    ("Bundesliga", "Bayern Munich", "Bochum"),
];

/// A small real-world dataset: four leagues, fourteen clubs, one free agent.
pub fn demo_dataset() -> Dataset {
    let mut data = Dataset::default();
    for (name, first, last) in LEAGUES {
        data.leagues.push(League {
            name: name.to_string(),
            first_place_team: Some(first.to_string()),
            last_place_team: Some(last.to_string()),
        });
    }
    for squad in SQUADS {
        data.teams.push(Team {
            name: squad.team.to_string(),
            governing_country: squad.country.to_string(),
            manager: Some(squad.manager.to_string()),
            league_standing: squad.standing,
            goals_for: squad.goals_for,
        });
        data.registrations
            .push((squad.team.to_string(), squad.league.to_string()));
        for (name, nationality, age, position, goals) in squad.players {
            data.players.push(Player {
                name: name.to_string(),
                nationality: nationality.to_string(),
                age: Some(*age),
                position: Some(position.to_string()),
                goals: *goals,
            });
            data.memberships
                .push((name.to_string(), squad.team.to_string()));
        }
    }
    // Not registered with any club.
    data.players.push(Player {
        name: "Paul Pogba".to_string(),
        nationality: "France".to_string(),
        age: Some(31),
        position: Some("CM".to_string()),
        goals: 56,
    });
    data
}

/// Generated leagues/teams/players for load testing.
pub fn synthetic_dataset<R: Rng>(
    rng: &mut R,
    leagues: usize,
    teams_per_league: usize,
    players_per_team: usize,
) -> Dataset {
    let mut data = Dataset::default();
    for l in 0..leagues {
        let league_name = format!("League {}", l + 1);
        let mut standings = (1..=teams_per_league as i64).collect::<Vec<_>>();
        standings.shuffle(rng);
        for (t, standing) in standings.into_iter().enumerate() {
            let team_name = format!("L{} Club {}", l + 1, t + 1);
            data.teams.push(Team {
                name: team_name.clone(),
                governing_country: pick(rng, NATIONS).to_string(),
                manager: Some(person_name(rng)),
                league_standing: standing,
                goals_for: rng.gen_range(20..110),
            });
            data.registrations.push((team_name.clone(), league_name.clone()));
            for p in 0..players_per_team {
                let name = format!("{} {}", person_name(rng), synthetic_suffix(l, t, p));
                data.players.push(Player {
                    name: name.clone(),
                    nationality: pick(rng, NATIONS).to_string(),
                    age: Some(rng.gen_range(17..38)),
                    position: Some(pick(rng, POSITIONS).to_string()),
                    goals: rng.gen_range(0..250),
                });
                data.memberships.push((name, team_name.clone()));
            }
        }
        data.leagues.push(League {
            name: league_name,
            first_place_team: Some(format!("L{} Club 1", l + 1)),
            last_place_team: Some(format!("L{} Club {}", l + 1, teams_per_league)),
        });
    }
    data
}

fn pick<'a, R: Rng>(rng: &mut R, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

fn person_name<R: Rng>(rng: &mut R) -> String {
    format!("{} {}", pick(rng, FIRST), pick(rng, LAST))
}

// Keeps generated player names unique and within the 30 character column.
fn synthetic_suffix(league: usize, team: usize, player: usize) -> String {
    format!("{}.{}.{}", league + 1, team + 1, player + 1)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::filter::MAX_TEXT_LEN;

    #[test]
    fn demo_dataset_is_consistent() {
        let data = demo_dataset();
        let teams = data.teams.iter().map(|t| t.name.as_str()).collect::<HashSet<_>>();
        let leagues = data.leagues.iter().map(|l| l.name.as_str()).collect::<HashSet<_>>();
        for (player, team) in &data.memberships {
            assert!(teams.contains(team.as_str()), "{player} -> {team}");
        }
        for (team, league) in &data.registrations {
            assert!(leagues.contains(league.as_str()), "{team} -> {league}");
        }
        assert!(data.players.iter().all(|p| p.name.len() <= MAX_TEXT_LEN));
    }

    #[test]
    fn synthetic_names_are_unique() {
        let mut rng = StdRng::seed_from_u64(7);
        let data = synthetic_dataset(&mut rng, 3, 10, 12);
        let names = data.players.iter().map(|p| &p.name).collect::<HashSet<_>>();
        assert_eq!(names.len(), 3 * 10 * 12);
        assert!(data.players.iter().all(|p| p.name.chars().count() <= MAX_TEXT_LEN));
        assert_eq!(data.teams.len(), 30);
    }
}
