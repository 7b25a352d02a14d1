//! Selection state for the interactive checklist.
//!
//! Owns the materialized post list plus one flag per list position. The UI
//! layer renders it and feeds toggles back in; nothing here touches a browser
//! or a terminal.

use crate::listing::Post;

#[derive(Debug, Default)]
pub struct Selection {
    entries: Vec<(bool, Post)>,
}

impl Selection {
    pub fn new(posts: Vec<Post>) -> Self {
        Self {
            entries: posts.into_iter().map(|post| (false, post)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flip one flag. Out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize) {
        if let Some((flag, _)) = self.entries.get_mut(index) {
            *flag = !*flag;
        }
    }

    /// Set every flag to `selected`, regardless of prior individual state.
    pub fn set_all(&mut self, selected: bool) {
        for (flag, _) in &mut self.entries {
            *flag = selected;
        }
    }

    /// Replace the selection wholesale with the given checked indices.
    pub fn set_checked(&mut self, checked: &[usize]) {
        self.set_all(false);
        for &index in checked {
            if let Some((flag, _)) = self.entries.get_mut(index) {
                *flag = true;
            }
        }
    }

    pub fn selected_count(&self) -> usize {
        self.entries.iter().filter(|(flag, _)| *flag).count()
    }

    /// The checked posts, in list order.
    pub fn selected(&self) -> Vec<Post> {
        self.entries
            .iter()
            .filter(|(flag, _)| *flag)
            .map(|(_, post)| post.clone())
            .collect()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.entries.iter().map(|(_, post)| post.clone()).collect()
    }

    pub fn titles(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|(_, post)| post.title.as_str())
            .collect()
    }

    pub fn flags(&self) -> Vec<bool> {
        self.entries.iter().map(|(flag, _)| *flag).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posts(n: usize) -> Vec<Post> {
        (1..=n)
            .map(|i| Post {
                title: format!("post {i}"),
                id: i.to_string(),
            })
            .collect()
    }

    #[test]
    fn starts_with_nothing_selected() {
        let selection = Selection::new(posts(3));
        assert_eq!(selection.len(), 3);
        assert_eq!(selection.selected_count(), 0);
    }

    #[test]
    fn set_all_overrides_prior_individual_state() {
        let mut selection = Selection::new(posts(4));
        selection.toggle(1);
        selection.toggle(3);

        selection.set_all(true);
        assert_eq!(selection.flags(), vec![true; 4]);

        selection.toggle(0);
        selection.set_all(false);
        assert_eq!(selection.flags(), vec![false; 4]);
    }

    #[test]
    fn toggle_flips_one_flag_and_ignores_out_of_range() {
        let mut selection = Selection::new(posts(2));
        selection.toggle(0);
        assert_eq!(selection.flags(), vec![true, false]);

        selection.toggle(0);
        selection.toggle(99);
        assert_eq!(selection.flags(), vec![false, false]);
    }

    #[test]
    fn selected_preserves_list_order() {
        let mut selection = Selection::new(posts(3));
        selection.toggle(2);
        selection.toggle(0);

        let chosen = selection.selected();
        assert_eq!(chosen.len(), 2);
        assert_eq!(chosen[0].id, "1");
        assert_eq!(chosen[1].id, "3");
    }

    #[test]
    fn set_checked_replaces_the_selection() {
        let mut selection = Selection::new(posts(3));
        selection.toggle(0);

        selection.set_checked(&[1, 2]);
        assert_eq!(selection.flags(), vec![false, true, true]);
    }
}
