use crossterm::event::{self, Event, KeyCode};
use kiss3d::nalgebra as na;
use kiss3d::scene::SceneNode;
use kiss3d::window::Window;
use nalgebra::{Matrix4, SVector};
use std::time::Duration;

use srs_arm_kinematics::{Kine7, SelfMotion, SingularityHandler, wrap_angle};

const DRAW_SCALE: f32 = 0.02;

/// Interactive self-motion explorer: the tool pose stays fixed while the
/// user sweeps the arm angle along the feasible arcs and watches the elbow
/// orbit the shoulder-to-wrist line.
pub struct SelfMotionSim {
    kine: Kine7,
    handler: SingularityHandler,
    motions: Vec<SelfMotion>,
    branch: usize,
    arm_angle: f64,
    step: f64,
    in_range: bool,
}

impl SelfMotionSim {
    pub fn new(kine: Kine7, target: &Matrix4<f64>) -> Result<Self, String> {
        let motions = kine.inverse(target);
        if motions.is_empty() {
            return Err("target pose is out of reach".into());
        }
        let handler = SingularityHandler::new(*kine.joint_limits());
        Ok(Self {
            kine,
            handler,
            motions,
            branch: 0,
            arm_angle: 0.0,
            step: 0.02,
            in_range: true,
        })
    }

    /// First in-limit joint vector at the current arm angle, if any.
    fn current_joints(&mut self) -> Option<SVector<f64, 7>> {
        let q = self.motions[self.branch]
            .get_joints(self.arm_angle, &self.handler)
            .into_iter()
            .next()?;
        self.handler.update_current_joints(&q);
        Some(q)
    }

    fn print_branches(&self) {
        for (i, motion) in self.motions.iter().enumerate() {
            println!("branch {}: elbow {:.4} rad", i, motion.elbow_joint());
            for arc in motion.arm_angle_range().arcs() {
                println!("  feasible arm angle [{:.4}, {:.4}]", arc.lower(), arc.upper());
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('a') => self.arm_angle = wrap_angle(self.arm_angle - self.step),
            KeyCode::Char('d') => self.arm_angle = wrap_angle(self.arm_angle + self.step),
            KeyCode::Char('b') => {
                self.branch = (self.branch + 1) % self.motions.len();
                println!(
                    "branch {} (elbow {:.4} rad)",
                    self.branch,
                    self.motions[self.branch].elbow_joint()
                );
            }
            KeyCode::Char(' ') => {
                self.arm_angle = 0.0;
                println!("arm angle reset to 0");
            }
            _ => {}
        }
    }

    pub fn run(&mut self) {
        println!("=== Self-Motion Explorer (Kiss3d) ===");
        println!("Controls:");
        println!("a/d    -> arm angle -/+");
        println!("b      -> next elbow branch");
        println!("space  -> reset arm angle");
        println!("q      -> quit\n");
        self.print_branches();

        let mut window = Window::new("7-DoF Self-Motion Explorer");

        let mut joint_nodes: Vec<SceneNode> = Vec::new();
        for _ in 0..8 {
            let mut s = window.add_sphere(0.05);
            s.set_color(1.0, 0.0, 0.0);
            joint_nodes.push(s);
        }

        while window.render() {
            // Non-blocking input check
            if event::poll(Duration::from_millis(1)).unwrap() {
                if let Event::Key(ev) = event::read().unwrap() {
                    match ev.code {
                        KeyCode::Char('q') => {
                            println!("Quitting explorer.");
                            break;
                        }
                        key => self.handle_key(key),
                    }
                }
            }

            match self.current_joints() {
                Some(q) => {
                    if !self.in_range {
                        println!("back inside the feasible set");
                        self.in_range = true;
                    }
                    let positions = self.kine.frame_positions(&q);
                    let points: Vec<na::Point3<f32>> = positions
                        .iter()
                        .map(|p| {
                            na::Point3::new(
                                p.x as f32 * DRAW_SCALE,
                                p.y as f32 * DRAW_SCALE,
                                p.z as f32 * DRAW_SCALE,
                            )
                        })
                        .collect();
                    for (node, p) in joint_nodes.iter_mut().zip(&points) {
                        node.set_local_translation(na::Translation3::new(p.x, p.y, p.z));
                    }
                    for pair in points.windows(2) {
                        window.draw_line(&pair[0], &pair[1], &na::Point3::new(0.0, 1.0, 0.0));
                    }
                }
                None => {
                    if self.in_range {
                        println!(
                            "arm angle {:.4} outside the feasible set of branch {}",
                            self.arm_angle, self.branch
                        );
                        self.in_range = false;
                    }
                }
            }
        }
    }
}
