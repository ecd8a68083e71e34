use std::collections::VecDeque;

use crate::{
    obstacles::{ObstacleId, ObstacleStore},
    rotation::CutMoment,
    timeline::ObstacleInterval,
};

/// Margins used when cutting walls around rotations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutSettings {
    pub front_cut: f32,
    pub back_cut: f32,
    pub min_duration: f32,
}

/// Walls across the center lanes, or wide walls starting in the leftmost
/// lane, cannot be played while the view rotates.
fn blocks_rotation(wall: &ObstacleInterval) -> bool {
    !wall.custom && (wall.lane == 1 || wall.lane == 2 || (wall.lane == 0 && wall.width > 1))
}

/// Rotating left cuts walls on the left side, rotating right those on the
/// right side.
fn faces_rotation(wall: &ObstacleInterval, units: i32) -> bool {
    wall.custom || (wall.lane <= 1 && units < 0) || (wall.lane >= 2 && units > 0)
}

/// Splits, shortens or removes every wall crossing a cut moment. Moments are
/// applied in the order they were recorded.
pub fn cut_obstacles(store: &mut ObstacleStore, moments: &[CutMoment], settings: CutSettings) {
    let mut queue: VecDeque<ObstacleId> = store.ids().into();

    while let Some(id) = queue.pop_front() {
        for moment in moments {
            let Some(wall) = store.get(id) else {
                break;
            };
            if wall.duration <= 0.0 {
                break;
            }

            if blocks_rotation(wall) {
                store.remove(id);
                break;
            }
            if !faces_rotation(wall, moment.units) {
                continue;
            }

            let (front, back) = if wall.custom {
                (0.0, 0.0)
            } else {
                (settings.front_cut, settings.back_cut)
            };
            let multiplier = moment.units.abs() as f32;
            if moment.time <= wall.time - front || moment.time >= wall.end() + back * multiplier {
                continue;
            }

            let first_time = wall.time;
            let first_duration = (moment.time - back * multiplier) - first_time;
            let second_time = moment.time + front;
            let second_duration = wall.end() - second_time;
            let first_fits = first_duration >= settings.min_duration;
            let second_fits = second_duration >= settings.min_duration;

            tracing::debug!(
                cut = moment.time,
                time = wall.time,
                duration = wall.duration,
                first_duration,
                second_time,
                second_duration,
                multiplier,
                "split wall"
            );

            match (first_fits, second_fits) {
                (true, true) => {
                    let second = ObstacleInterval {
                        time: second_time,
                        duration: second_duration,
                        ..wall.clone()
                    };
                    if let Some(wall) = store.get_mut(id) {
                        wall.duration = first_duration;
                    }
                    queue.push_back(store.insert(second));
                }
                (true, false) => {
                    if let Some(wall) = store.get_mut(id) {
                        wall.duration = first_duration;
                    }
                }
                (false, true) => {
                    if second_time != wall.time || second_duration != wall.duration {
                        if let Some(wall) = store.get_mut(id) {
                            wall.time = second_time;
                            wall.duration = second_duration;
                        }
                        queue.push_back(id);
                        break;
                    }
                }
                (false, false) => {
                    store.remove(id);
                    break;
                }
            }
        }
    }
}
