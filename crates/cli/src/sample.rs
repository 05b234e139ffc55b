use screenplay::ProjectMeta;
use storyboard::{Shot, ShotStatus};

/// Seed shots for the storyboard demo, in the shape a finished analysis
/// pass would leave them.
pub fn sample_shots() -> Vec<Shot> {
    let scene = "EXT. HARBOR STACKS - NIGHT";
    let mut shots = vec![
        Shot::new(
            "Juno's skiff threads between container towers, running lights off",
            "A small salvage skiff gliding between towering stacked containers at night, no lights",
            scene,
        ),
        Shot::new(
            "Castor waits on the rope bridge, collar up against the rain",
            "An older man in a long coat standing on a rope bridge between containers, heavy rain",
            scene,
        ),
        Shot::new(
            "Close on Juno's prosthetic hand gripping the throttle",
            "Close-up of a weathered prosthetic hand on a boat throttle, rain beading on metal",
            scene,
        ),
        Shot::new(
            "Wren watches from a gantry, half in shadow",
            "A kid crouched on a high gantry above dark water, lit by one sodium lamp",
            scene,
        ),
        Shot::new(
            "Wide: the stacks swallow the skiff as fog rolls in",
            "Wide establishing shot of container towers over black water, fog closing in",
            scene,
        ),
    ];

    // A board mid-session: some work done, some in flight.
    shots[0].status = ShotStatus::Completed;
    shots[0].thumbnail = Some("https://picsum.photos/seed/skiff/200/120".to_string());
    shots[1].status = ShotStatus::Generating;
    shots
}

/// Recent projects shown on the landing screen.
pub fn recent_projects() -> Vec<ProjectMeta> {
    ["Harbor Stacks", "Signal Fires", "The Dry Archive", "Low Orbit"]
        .into_iter()
        .map(ProjectMeta::new)
        .collect()
}
