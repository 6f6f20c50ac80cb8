//! Side-scrolling platformer simulation: tile world, entity behaviors, boss
//! encounter and the fixed-step loop that drives them. Drawing and audio are
//! left to the host through [`render::Renderer`] and [`cues::CueSink`].

pub mod behavior;
pub mod body;
pub mod boss;
pub mod camera;
pub mod collision;
pub mod config;
pub mod cues;
pub mod effect;
pub mod entity;
pub mod game_loop;
pub mod hostile;
pub mod input_script;
pub mod interaction;
pub mod level;
pub mod lifecycle;
pub mod pickup;
pub mod player;
pub mod projectile;
pub mod render;
pub mod schedule;
pub mod spawner;
pub mod tick;
pub mod turret;
pub mod world;
