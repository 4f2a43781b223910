//! Interactive console player.
//!
//! Replaces every AI decision of its role with a numbered prompt over
//! stdin. `0` means abstain where abstaining is allowed. Input errors
//! re-prompt; the loop only exits on a valid choice, so the engine never
//! sees an invalid interactive intent.

use std::io::{self, Write};

use crate::core::types::{PlayerId, Role};
use crate::moderator::Moderator;

use super::Ctx;

pub(super) struct Console {
    role: Role,
}

impl Console {
    pub(super) fn new(role: Role) -> Self {
        Self { role }
    }

    pub(super) fn role(&self) -> Role {
        self.role
    }
}

fn print_candidates(cx: &Ctx, cands: &[PlayerId], with_zero_skip: bool) {
    let st = cx.state.read().unwrap();
    if with_zero_skip {
        println!("  0) abstain / nobody");
    }
    for (k, &pid) in cands.iter().enumerate() {
        println!("  {}) {}", k + 1, st.tag(pid));
    }
}

fn read_number() -> Option<usize> {
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok()?;
    buf.trim().parse::<usize>().ok()
}

/// Pick from `cands`, 1-based; re-prompts until valid.
fn prompt_pick(cands: &[PlayerId]) -> PlayerId {
    loop {
        print!("Your choice (1-{}): ", cands.len());
        let _ = io::stdout().flush();
        match read_number() {
            Some(k) if (1..=cands.len()).contains(&k) => return cands[k - 1],
            _ => println!("Invalid input, try again."),
        }
    }
}

/// Like `prompt_pick` but `0` abstains.
fn prompt_pick_optional(cands: &[PlayerId]) -> Option<PlayerId> {
    loop {
        print!("Your choice (0-{}): ", cands.len());
        let _ = io::stdout().flush();
        match read_number() {
            Some(0) => return None,
            Some(k) if (1..=cands.len()).contains(&k) => return Some(cands[k - 1]),
            _ => println!("Invalid input, try again."),
        }
    }
}

pub(super) fn vote_day(cx: &mut Ctx, _console: &Console) -> PlayerId {
    let cands = cx.alive_except_self();
    if cands.is_empty() {
        return cx.id;
    }
    println!("\n[HUMAN] Day. Choose who to vote against:");
    print_candidates(cx, &cands, false);
    prompt_pick(&cands)
}

pub(super) fn night(cx: &mut Ctx, console: &Console, m: &Moderator) {
    match console.role {
        Role::Citizen | Role::Executioner => {
            // Nothing at night; the Executioner is consulted on day ties.
        }
        Role::Mafia => {
            let cands = cx.alive_except_self();
            if cands.is_empty() {
                return;
            }
            println!("\n[HUMAN] Night (Mafia). Whom do we mark for the kill?");
            print_candidates(cx, &cands, false);
            let target = prompt_pick(&cands);
            m.mafia_vote_target(cx.id, target);
        }
        Role::Detective => {
            let cands = cx.alive_except_self();
            if cands.is_empty() {
                return;
            }
            println!("\n[HUMAN] Night (Detective). Choose a target to shoot (0 = nobody):");
            print_candidates(cx, &cands, true);
            if let Some(target) = prompt_pick_optional(&cands) {
                m.set_detective_shot(cx.id, target);
            }
        }
        Role::Doctor => {
            let cands = cx.alive_including_self();
            if cands.is_empty() {
                return;
            }
            println!("\n[HUMAN] Night (Doctor). Whom to heal?");
            print_candidates(cx, &cands, false);
            let target = prompt_pick(&cands);
            m.set_doctor_heal(cx.id, target);
        }
        Role::Maniac => {
            let cands = cx.alive_except_self();
            if cands.is_empty() {
                return;
            }
            println!("\n[HUMAN] Night (Maniac). Whom to kill?");
            print_candidates(cx, &cands, false);
            let target = prompt_pick(&cands);
            m.set_maniac_target(cx.id, target);
        }
        Role::Journalist => {
            let cands = cx.alive_except_self();
            if cands.len() < 2 {
                return;
            }
            println!("\n[HUMAN] Night (Journalist). Choose the FIRST player to compare:");
            print_candidates(cx, &cands, false);
            let a = prompt_pick(&cands);

            let cands2: Vec<PlayerId> = cands.into_iter().filter(|&p| p != a).collect();
            println!("\n[HUMAN] Night (Journalist). Choose the SECOND player to compare:");
            print_candidates(cx, &cands2, false);
            let b = prompt_pick(&cands2);

            m.set_journalist_compare(cx.id, a, b);
        }
        Role::Eavesdropper => {
            let cands = cx.alive_except_self();
            if cands.is_empty() {
                return;
            }
            println!("\n[HUMAN] Night (Eavesdropper). Whose night to listen in on?");
            print_candidates(cx, &cands, false);
            let target = prompt_pick(&cands);
            m.set_eavesdropper_target(cx.id, target);
        }
    }
}

pub(super) fn decide_execution(cx: &mut Ctx, leaders: &[PlayerId]) -> Option<PlayerId> {
    println!("\n[HUMAN] Day tie (Executioner). Execute one of the leaders or abstain.");
    println!("Enter 0 to ABSTAIN, or a number from the list:");
    print_candidates(cx, leaders, true);
    prompt_pick_optional(leaders)
}
