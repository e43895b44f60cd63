pub mod common;

#[cfg(test)]
mod test_battle_start;






#[cfg(test)]
mod test_held_items;


#[cfg(test)]
mod test_resolve_turn;

#[cfg(test)]
mod test_special_moves;
