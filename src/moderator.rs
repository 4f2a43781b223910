//! The moderator: the single arbiter of a match.
//!
//! Agents submit *intents* (day votes, night actions, information queries)
//! while a phase is open; the moderator buffers them behind one mutex,
//! resolves each phase in bulk once every agent has reported, mutates the
//! world (killing players), and keeps the per-round journal that becomes
//! the round transcript file.
//!
//! Lock order: a `state` read guard may be held while taking the internal
//! mutex, never the other way round, and the `state` write lock (kills,
//! round/phase advance) is only ever taken with the internal mutex
//! released.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Mutex;

use crate::core::config::{GameConfig, LogMode, TiePolicy};
use crate::core::rng::GameRng;
use crate::core::types::{PlayerId, Role, Team, Winner};
use crate::roles::AgentVec;
use crate::state::SharedState;

/// UTF-8 byte-order mark prefixing every transcript file.
const BOM: &str = "\u{FEFF}";

#[derive(Debug, Clone, Copy)]
struct JournalistQuery {
    jid: PlayerId,
    a: PlayerId,
    b: PlayerId,
}

/// Per-player accumulators for the summary table.
#[derive(Debug, Default)]
struct MatchStats {
    votes_given: Vec<u32>,
    votes_received: Vec<u32>,
    mafia_votes: Vec<u32>,
    detective_shots: Vec<u32>,
    doctor_heals: Vec<u32>,
    maniac_targets: Vec<u32>,
    /// Round the player died in; 0 while alive.
    died_round: Vec<usize>,
}

impl MatchStats {
    fn sized(n: usize) -> Self {
        Self {
            votes_given: vec![0; n],
            votes_received: vec![0; n],
            mafia_votes: vec![0; n],
            detective_shots: vec![0; n],
            doctor_heals: vec![0; n],
            maniac_targets: vec![0; n],
            died_round: vec![0; n],
        }
    }

    fn record_death(&mut self, id: PlayerId, round: usize) {
        if self.died_round[id] == 0 {
            self.died_round[id] = round;
        }
    }
}

/// Everything the moderator mutates, behind the single mutex.
struct ModInner {
    rng: GameRng,

    // Day buffers, reset by `begin_day`.
    day_votes: Vec<Option<PlayerId>>,
    day_voted_flag: Vec<bool>,

    // Night buffers, reset at the end of `resolve_night`.
    mafia_tally: Vec<u32>,
    detective_shot: Option<PlayerId>,
    doctor_heal: Option<PlayerId>,
    maniac_target: Option<PlayerId>,
    journalist_queries: Vec<JournalistQuery>,
    eavesdrop_requests: Vec<(PlayerId, PlayerId)>,

    stats: MatchStats,

    // Round journal.
    round_index: usize,
    round_written: bool,
    round_log: String,
}

pub struct Moderator {
    cfg: GameConfig,
    state: SharedState,
    agents: AgentVec,
    inner: Mutex<ModInner>,
}

impl Moderator {
    pub fn new(cfg: GameConfig, state: SharedState, agents: AgentVec, rng: GameRng) -> Self {
        let n = state.read().unwrap().players().len();
        let inner = ModInner {
            rng,
            day_votes: vec![None; n],
            day_voted_flag: vec![false; n],
            mafia_tally: vec![0; n],
            detective_shot: None,
            doctor_heal: None,
            maniac_target: None,
            journalist_queries: Vec::new(),
            eavesdrop_requests: Vec::new(),
            stats: MatchStats::sized(n),
            round_index: 0,
            round_written: false,
            round_log: String::new(),
        };
        Self {
            cfg,
            state,
            agents,
            inner: Mutex::new(inner),
        }
    }

    fn is_full(&self) -> bool {
        self.cfg.log_mode == LogMode::Full
    }

    fn is_open(&self) -> bool {
        self.cfg.open_announcements
    }

    // ---------------- Day ----------------

    /// Open a new round: clear the day buffers and start the journal with
    /// the roster of the living.
    pub fn begin_day(&self) {
        let st = self.state.read().unwrap();
        let n = st.players().len();

        let mut g = self.inner.lock().unwrap();
        g.day_votes = vec![None; n];
        g.day_voted_flag = vec![false; n];

        g.round_index += 1;
        g.round_written = false;
        g.round_log.clear();

        let round_index = g.round_index;
        let _ = writeln!(g.round_log, "=== ROUND {} (Day) ===", round_index);
        g.round_log.push_str("Alive at start of day:\n");
        for p in st.players().iter().filter(|p| p.alive) {
            let _ = writeln!(
                g.round_log,
                "  #{} {} | role={} | team={}",
                p.id + 1,
                p.name,
                p.role,
                p.team
            );
        }
        let round = g.round_index;
        drop(g);
        drop(st);

        tracing::info!("Day: round {round} begins");
    }

    /// Record a day vote; last vote wins per voter.
    pub fn submit_day_vote(&self, voter: PlayerId, target: PlayerId) {
        let st = self.state.read().unwrap();
        if voter == target || !st.is_alive(voter) || !st.is_alive(target) {
            return;
        }

        let mut g = self.inner.lock().unwrap();
        if !g.day_voted_flag[voter] {
            g.day_voted_flag[voter] = true;
            g.stats.votes_given[voter] += 1;
        }
        g.day_votes[voter] = Some(target);
        let line = format!("DAY: vote {} -> {}\n", st.tag(voter), st.tag(target));
        g.round_log.push_str(&line);
        drop(g);
        drop(st);

        if self.is_full() {
            tracing::info!("Day vote: #{} -> #{}", voter + 1, target + 1);
        }
    }

    /// Resolve the day vote. Returns the lynched player, if any.
    pub fn resolve_day_lynch(&self) -> Option<PlayerId> {
        let (leaders, max_votes) = {
            let st = self.state.read().unwrap();
            let n = st.players().len();
            let mut g = self.inner.lock().unwrap();
            let votes: Vec<Option<PlayerId>> = g.day_votes.clone();

            if self.is_full() {
                let mut s = String::from("Day votes:");
                for v in 0..n {
                    if !st.is_alive(v) {
                        continue;
                    }
                    match votes[v] {
                        Some(t) => {
                            let _ = write!(s, " #{}->#{}", v + 1, t + 1);
                        }
                        None => {
                            let _ = write!(s, " #{}->-", v + 1);
                        }
                    }
                }
                tracing::info!("{s}");
            }

            // Final ballots from alive voters to alive targets.
            let mut tally = vec![0u32; n];
            for v in 0..n {
                if !st.is_alive(v) {
                    continue;
                }
                let Some(t) = votes[v] else { continue };
                if st.is_alive(t) {
                    tally[t] += 1;
                }
            }
            for (i, &c) in tally.iter().enumerate() {
                g.stats.votes_received[i] += c;
            }

            let max_votes = tally.iter().copied().max().unwrap_or(0);
            let leaders: Vec<PlayerId> = (0..n).filter(|&i| tally[i] == max_votes).collect();
            (leaders, max_votes)
        };

        if max_votes == 0 {
            tracing::info!("Day: no valid votes; nobody is lynched");
            self.journal("DAY: no lynch\n");
            return None;
        }

        if leaders.len() > 1 {
            return match self.cfg.tie_policy {
                TiePolicy::None => self.resolve_tie_via_executioner(&leaders),
                TiePolicy::Random => {
                    let victim = {
                        let mut g = self.inner.lock().unwrap();
                        g.rng.pick(&leaders).expect("tie leaders are non-empty")
                    };
                    tracing::info!("Day: tie detected; victim chosen randomly");
                    self.journal("DAY: tie -> victim chosen randomly\n");
                    self.lynch(victim);
                    Some(victim)
                }
            };
        }

        let victim = leaders[0];
        self.lynch(victim);
        Some(victim)
    }

    /// Ask each alive Executioner, in id order, to break the tie. The
    /// first valid in-set choice wins; if every Executioner abstains or
    /// chooses invalidly, the day ends with no lynch.
    fn resolve_tie_via_executioner(&self, leaders: &[PlayerId]) -> Option<PlayerId> {
        let executioners: Vec<PlayerId> = {
            let st = self.state.read().unwrap();
            st.players()
                .iter()
                .filter(|p| p.alive && p.role == Role::Executioner)
                .map(|p| p.id)
                .collect()
        };

        for ex in executioners {
            let decision = {
                let mut agent = self.agents[ex].lock().unwrap();
                agent.decide_execution(leaders)
            };

            let ex_tag = self.state.read().unwrap().tag(ex);
            match decision {
                None => {
                    self.journal(&format!("DAY: executioner abstains ({ex_tag})\n"));
                }
                Some(victim) if !leaders.contains(&victim) => {
                    self.journal(&format!("DAY: executioner invalid choice by {ex_tag}\n"));
                }
                Some(victim) => {
                    let (victim_tag, role) = {
                        let st = self.state.read().unwrap();
                        let role = st.player(victim).map(|p| p.role);
                        (st.tag(victim), role)
                    };
                    let role = role.expect("tie leader exists");
                    self.journal(&format!("DAY: executioner chooses {victim_tag}\n"));
                    self.journal(&format!(
                        "DAY: executioner-lynch {victim_tag} ({role})\n"
                    ));
                    tracing::info!("Day: executioner chose victim #{}", victim + 1);

                    self.record_death_round(victim);
                    self.kill_player(victim);
                    return Some(victim);
                }
            }
        }

        tracing::info!("Day: tie detected; tie policy = none -> nobody is lynched");
        self.journal("DAY: tie -> no lynch\n");
        None
    }

    /// Journal, announce and apply a day lynch.
    fn lynch(&self, victim: PlayerId) {
        let (tag, role) = {
            let st = self.state.read().unwrap();
            let role = st.player(victim).map(|p| p.role).expect("victim in range");
            (st.tag(victim), role)
        };
        self.journal(&format!("DAY: lynch victim {tag} ({role})\n"));
        if self.is_open() {
            tracing::info!("Day: lynched #{} ({role})", victim + 1);
        } else {
            tracing::info!("Day: lynched player #{}", victim + 1);
        }
        self.record_death_round(victim);
        self.kill_player(victim);
    }

    // ---------------- Night ----------------

    /// One mafia ballot for a kill target. Every ballot counts; a mafioso
    /// re-voting adds another increment (tally semantics of the original
    /// engine, preserved).
    pub fn mafia_vote_target(&self, voter: PlayerId, target: PlayerId) {
        let st = self.state.read().unwrap();
        if voter == target || !st.is_alive(voter) || !st.is_alive(target) {
            return;
        }
        if st.player(voter).map(|p| p.team) != Some(Team::Mafia) {
            return;
        }

        let mut g = self.inner.lock().unwrap();
        g.mafia_tally[target] += 1;
        g.stats.mafia_votes[voter] += 1;
        let line = format!("NIGHT: mafia-vote {} -> {}\n", st.tag(voter), st.tag(target));
        g.round_log.push_str(&line);
        drop(g);
        drop(st);

        if self.is_full() && self.is_open() {
            tracing::info!("Night (open): mafia vote by #{} -> #{}", voter + 1, target + 1);
        }
    }

    /// Faction probe: is `target` an alive member of the mafia? The
    /// Maniac reads as not-mafia. Read-only; does not touch night buffers.
    pub fn investigate(&self, _detective: PlayerId, target: PlayerId) -> bool {
        let st = self.state.read().unwrap();
        st.player(target)
            .map(|p| p.alive && p.team == Team::Mafia)
            .unwrap_or(false)
    }

    pub fn set_detective_shot(&self, detective: PlayerId, target: PlayerId) {
        let st = self.state.read().unwrap();
        if detective == target || !st.is_alive(detective) || !st.is_alive(target) {
            return;
        }

        let mut g = self.inner.lock().unwrap();
        g.detective_shot = Some(target);
        g.stats.detective_shots[detective] += 1;
        let line = format!("NIGHT: detective-shot -> {}\n", st.tag(target));
        g.round_log.push_str(&line);
        drop(g);
        drop(st);

        if self.is_full() && self.is_open() {
            tracing::info!("Night (open): detective shot -> #{}", target + 1);
        }
    }

    /// Heal a target; self-heal is permitted.
    pub fn set_doctor_heal(&self, doctor: PlayerId, target: PlayerId) {
        let st = self.state.read().unwrap();
        if !st.is_alive(doctor) || !st.is_alive(target) {
            return;
        }

        let mut g = self.inner.lock().unwrap();
        g.doctor_heal = Some(target);
        g.stats.doctor_heals[doctor] += 1;
        let line = format!("NIGHT: doctor-heal {}\n", st.tag(target));
        g.round_log.push_str(&line);
        drop(g);
        drop(st);

        if self.is_full() && self.is_open() {
            tracing::info!("Night (open): doctor heals #{}", target + 1);
        }
    }

    pub fn set_maniac_target(&self, maniac: PlayerId, target: PlayerId) {
        let st = self.state.read().unwrap();
        if maniac == target || !st.is_alive(maniac) || !st.is_alive(target) {
            return;
        }
        if st.player(maniac).map(|p| p.team) != Some(Team::Maniac) {
            return;
        }

        let mut g = self.inner.lock().unwrap();
        g.maniac_target = Some(target);
        g.stats.maniac_targets[maniac] += 1;
        let line = format!("NIGHT: maniac-target -> {}\n", st.tag(target));
        g.round_log.push_str(&line);
        drop(g);
        drop(st);

        if self.is_full() && self.is_open() {
            tracing::info!("Night (open): maniac targets #{}", target + 1);
        }
    }

    /// Journalist query: do `a` and `b` fight for the same team? Targets
    /// must be distinct, alive and different from the journalist.
    pub fn set_journalist_compare(&self, journalist: PlayerId, a: PlayerId, b: PlayerId) {
        let st = self.state.read().unwrap();
        if a == b || journalist == a || journalist == b {
            return;
        }
        if !st.is_alive(journalist) || !st.is_alive(a) || !st.is_alive(b) {
            return;
        }

        let mut g = self.inner.lock().unwrap();
        g.journalist_queries.push(JournalistQuery { jid: journalist, a, b });
        let line = format!(
            "NIGHT: journalist-compare by {} -> {} vs {}\n",
            st.tag(journalist),
            st.tag(a),
            st.tag(b)
        );
        g.round_log.push_str(&line);
    }

    /// Eavesdropper observation target (not self).
    pub fn set_eavesdropper_target(&self, eavesdropper: PlayerId, target: PlayerId) {
        let st = self.state.read().unwrap();
        if eavesdropper == target || !st.is_alive(eavesdropper) || !st.is_alive(target) {
            return;
        }

        let mut g = self.inner.lock().unwrap();
        g.eavesdrop_requests.push((eavesdropper, target));
        let line = format!(
            "NIGHT: eavesdropper-target by {} -> {}\n",
            st.tag(eavesdropper),
            st.tag(target)
        );
        g.round_log.push_str(&line);
    }

    /// Resolve the night: pick the mafia victim from the tally, build the
    /// kill set, apply the heal, answer the information queries, apply
    /// deaths in id order and write the round file.
    pub fn resolve_night(&self) -> Vec<PlayerId> {
        let mut deaths: Vec<PlayerId> = Vec::new();
        let mut open_death_roles: Vec<(PlayerId, String)> = Vec::new();
        let mut closed_death_teams: Vec<(PlayerId, Team)> = Vec::new();

        {
            let st = self.state.read().unwrap();
            let n = st.players().len();
            let mut g = self.inner.lock().unwrap();

            // Snapshot the buffers; the live ones are cleared below.
            let mafia_tally = g.mafia_tally.clone();
            let detective_shot = g.detective_shot;
            let doctor_heal = g.doctor_heal;
            let maniac_target = g.maniac_target;
            let journalist_queries = g.journalist_queries.clone();
            let eavesdrop_requests = g.eavesdrop_requests.clone();

            if self.is_full() {
                if self.is_open() {
                    let mut s = String::from("Night (open): mafia tally:");
                    let mut any = false;
                    for i in 0..n {
                        if mafia_tally[i] > 0 && st.is_alive(i) {
                            let _ = write!(s, " #{}({})", i + 1, mafia_tally[i]);
                            any = true;
                        }
                    }
                    if !any {
                        s.push_str(" none");
                    }
                    tracing::info!("{s}");
                } else {
                    tracing::info!("Night: actions recorded (closed)");
                }
            }

            // Aggregated mafia ballot line for the transcript.
            {
                let mut line = String::from("NIGHT: mafia-tally");
                let mut any = false;
                for i in 0..n {
                    if mafia_tally[i] > 0 && st.is_alive(i) {
                        let _ = write!(line, " {}({})", st.tag(i), mafia_tally[i]);
                        any = true;
                    }
                }
                if !any {
                    line.push_str(" none");
                }
                line.push('\n');
                g.round_log.push_str(&line);
            }

            // Mafia victim: top of the tally, uniform among tied leaders.
            let mafia_victim: Option<PlayerId> = {
                let top = mafia_tally.iter().copied().max().unwrap_or(0);
                if top > 0 {
                    let cands: Vec<PlayerId> = (0..n)
                        .filter(|&i| mafia_tally[i] == top && st.is_alive(i))
                        .collect();
                    g.rng.pick(&cands)
                } else {
                    None
                }
            };

            let mut to_kill = vec![false; n];
            let mut mark = |g: &mut ModInner, tid: Option<PlayerId>, source: &str| {
                let Some(t) = tid else { return };
                if t < n && st.is_alive(t) {
                    to_kill[t] = true;
                    let line = format!("NIGHT: marked-by-{source} {}\n", st.tag(t));
                    g.round_log.push_str(&line);
                }
            };
            mark(&mut g, mafia_victim, "mafia");
            mark(&mut g, detective_shot, "detective");
            mark(&mut g, maniac_target, "maniac");

            // The heal cancels every mark on its target.
            if let Some(h) = doctor_heal {
                if h < n && st.is_alive(h) {
                    if self.is_full() && self.is_open() {
                        tracing::info!("Night (open): heal cancels death of #{}", h + 1);
                    }
                    let line = format!("NIGHT: heal-cancels {}\n", st.tag(h));
                    g.round_log.push_str(&line);
                    to_kill[h] = false;
                }
            }

            // Journalist answers: team equality, journal-only.
            for q in &journalist_queries {
                let (Some(pa), Some(pb)) = (st.player(q.a), st.player(q.b)) else {
                    continue;
                };
                let same = pa.team == pb.team;
                let line = format!(
                    "NIGHT: journalist-result by {} -> {} vs {} : {}\n",
                    st.tag(q.jid),
                    st.tag(q.a),
                    st.tag(q.b),
                    if same { "SAME" } else { "DIFFERENT" }
                );
                g.round_log.push_str(&line);
            }

            // Eavesdropper answers: everything that targeted the observed
            // player tonight, or `none`.
            for &(eid, tgt) in &eavesdrop_requests {
                if tgt >= n {
                    continue;
                }
                let mut line = format!(
                    "NIGHT: eavesdropper-result for {} by {} ->",
                    st.tag(tgt),
                    st.tag(eid)
                );
                let mut any = false;
                if mafia_tally[tgt] > 0 {
                    let _ = write!(line, " mafia({})", mafia_tally[tgt]);
                    any = true;
                }
                if detective_shot == Some(tgt) {
                    line.push_str(if any { "," } else { "" });
                    line.push_str(" det-shot");
                    any = true;
                }
                if doctor_heal == Some(tgt) {
                    line.push_str(if any { "," } else { "" });
                    line.push_str(" doc-heal");
                    any = true;
                }
                if maniac_target == Some(tgt) {
                    line.push_str(if any { "," } else { "" });
                    line.push_str(" maniac");
                    any = true;
                }
                if !any {
                    line.push_str(" none");
                }
                line.push('\n');
                g.round_log.push_str(&line);
            }

            // Death list, id order for determinism.
            deaths = (0..n).filter(|&i| to_kill[i]).collect();
            let round = g.round_index;
            for &id in &deaths {
                let p = st.player(id).expect("marked id in range");
                if self.is_open() {
                    open_death_roles.push((id, p.role.to_string()));
                } else {
                    closed_death_teams.push((id, p.team));
                }
                g.stats.record_death(id, round);
                let line = format!("NIGHT: death {} ({})\n", st.tag(id), p.role);
                g.round_log.push_str(&line);
            }

            // Night buffers are per-phase; clear for the next round.
            g.mafia_tally = vec![0; n];
            g.detective_shot = None;
            g.doctor_heal = None;
            g.maniac_target = None;
            g.journalist_queries.clear();
            g.eavesdrop_requests.clear();
        }

        for (id, role) in &open_death_roles {
            tracing::info!("Night (open): #{} died ({role})", id + 1);
        }

        for &id in &deaths {
            self.kill_player(id);
        }

        if deaths.is_empty() {
            tracing::info!("Night: no deaths");
        } else if !self.is_open() {
            let mut s = String::from("Night: deaths:");
            for &(id, team) in &closed_death_teams {
                let _ = write!(s, " #{} ({team})", id + 1);
            }
            tracing::info!("{s}");
        }

        let mut g = self.inner.lock().unwrap();
        self.write_round_file_locked(&mut g, true);
        drop(g);

        deaths
    }

    // ---------------- Common operations ----------------

    /// Idempotent kill; dead players keep role/team readable for
    /// post-mortem journalling.
    pub fn kill_player(&self, id: PlayerId) {
        let transitioned = self.state.write().unwrap().kill(id);
        if transitioned && !self.is_open() {
            tracing::info!("Player #{} has died", id + 1);
        }
    }

    fn record_death_round(&self, id: PlayerId) {
        let mut g = self.inner.lock().unwrap();
        let round = g.round_index;
        g.stats.record_death(id, round);
    }

    /// Termination check, in priority order.
    pub fn evaluate_winner(&self) -> Winner {
        let (maf, man, town) = self.state.read().unwrap().alive_team_counts();
        if maf + man + town == 0 {
            panic!("evaluate_winner: no players alive; engine invariant broken");
        }
        if maf == 0 && man == 0 {
            return Winner::Town;
        }
        if maf == 0 && man == 1 && town == 1 {
            return Winner::Maniac;
        }
        if maf > 0 && maf >= town + man {
            return Winner::Mafia;
        }
        Winner::None
    }

    fn journal(&self, line: &str) {
        let mut g = self.inner.lock().unwrap();
        g.round_log.push_str(line);
    }

    // ---------------- Round and summary files ----------------

    /// Flush the journal to `logs_dir/round_<R>.txt`; once per round.
    /// Failures are logged and the round is marked written so the match
    /// carries on without retry loops.
    fn write_round_file_locked(&self, g: &mut ModInner, night_completed: bool) {
        if g.round_written || g.round_index == 0 {
            return;
        }
        g.round_written = true;

        let dir = Path::new(&self.cfg.logs_dir);
        if let Err(e) = std::fs::create_dir_all(dir) {
            tracing::error!("Failed to create logs dir {}: {e}", dir.display());
            return;
        }
        let path = dir.join(format!("round_{}.txt", g.round_index));

        let mut content = String::with_capacity(g.round_log.len() + 64);
        content.push_str(BOM);
        content.push_str(&g.round_log);
        let _ = writeln!(
            content,
            "=== ROUND {} END ({}) ===",
            g.round_index,
            if night_completed { "night completed" } else { "no night" }
        );

        if let Err(e) = std::fs::write(&path, content) {
            tracing::error!("Failed to write round file {}: {e}", path.display());
        }
    }

    /// Close out a round that ended during Day (no night half).
    pub fn finalize_round_file_if_pending(&self) {
        let mut g = self.inner.lock().unwrap();
        self.write_round_file_locked(&mut g, false);
    }

    /// Write `logs_dir/summary.txt`: winner plus the per-player statistics
    /// table. Overwrites on each invocation.
    pub fn write_summary_file(&self) {
        let st = self.state.read().unwrap();
        let winner = st.winner();
        let g = self.inner.lock().unwrap();

        let mut out = String::new();
        out.push_str(BOM);
        out.push_str("=== SUMMARY ===\n");
        let _ = writeln!(out, "Winner: {winner}");
        out.push('\n');
        out.push_str(
            "#  Name            Role             Team      Status    Died@Round  \
             VotesGiven  VotesRecv  MafiaVotes  DetShots  DocHeals  ManiacTargets\n",
        );
        out.push_str(
            "--------------------------------------------------------------------\
             ---------------------------------------------------------\n",
        );

        fn pad(s: &str, w: usize) -> String {
            if s.len() >= w {
                s[..w].to_string()
            } else {
                format!("{s}{}", " ".repeat(w - s.len()))
            }
        }

        for p in st.players() {
            let i = p.id;
            let died = g.stats.died_round[i];
            let died_s = if died > 0 { died.to_string() } else { "-".to_string() };
            let _ = writeln!(
                out,
                "{:>2} {} {} {} {} {:>10} {:>10} {:>10} {:>11} {:>8} {:>9} {:>14}",
                i + 1,
                pad(&p.name, 15),
                pad(&p.role.to_string(), 16),
                pad(&p.team.to_string(), 9),
                pad(if p.alive { "ALIVE" } else { "DEAD" }, 9),
                died_s,
                g.stats.votes_given[i],
                g.stats.votes_received[i],
                g.stats.mafia_votes[i],
                g.stats.detective_shots[i],
                g.stats.doctor_heals[i],
                g.stats.maniac_targets[i],
            );
        }

        let dir = Path::new(&self.cfg.logs_dir);
        if let Err(e) = std::fs::create_dir_all(dir) {
            tracing::error!("Failed to create logs dir {}: {e}", dir.display());
            return;
        }
        let path = dir.join("summary.txt");
        if let Err(e) = std::fs::write(&path, out) {
            tracing::error!("Failed to write summary file {}: {e}", path.display());
        }
    }

    /// Journal snapshot, for tests and post-mortem inspection.
    pub fn round_journal(&self) -> String {
        self.inner.lock().unwrap().round_log.clone()
    }
}
