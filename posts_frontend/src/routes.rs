use std::fmt;

/// Deepest back stack kept.
const MAX_HISTORY: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    List,
    Create,
    Edit(u64),
    Detail(u64),
}

impl Route {
    pub fn parse(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let segments: Vec<&str> = trimmed
            .trim_matches('/')
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        match segments.as_slice() {
            [] => Some(Route::List),
            ["create"] => Some(Route::Create),
            ["edit", id] => parse_id(id).map(Route::Edit),
            ["post", id] => parse_id(id).map(Route::Detail),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::List => "/".to_string(),
            Route::Create => "/create".to_string(),
            Route::Edit(id) => format!("/edit/{id}"),
            Route::Detail(id) => format!("/post/{id}"),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::List => "Posts",
            Route::Create => "Create",
            Route::Edit(_) => "Edit",
            Route::Detail(_) => "Detail",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn parse_id(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok().filter(|id| *id > 0)
}

/// Current route plus the back stack.
#[derive(Debug, Clone)]
pub struct Router {
    current: Route,
    history: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::List)
    }
}

impl Router {
    pub fn new(start: Route) -> Self {
        Self {
            current: start,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> Route {
        self.current
    }

    /// Returns false when already on `route`. The list is the root, so
    /// reaching it resets the history.
    pub fn navigate(&mut self, route: Route) -> bool {
        if route == self.current {
            return false;
        }
        if route == Route::List {
            self.history.clear();
        } else {
            if self.history.len() >= MAX_HISTORY {
                self.history.remove(0);
            }
            self.history.push(self.current);
        }
        self.current = route;
        true
    }

    pub fn back(&mut self) -> Route {
        self.current = self.history.pop().unwrap_or(Route::List);
        self.current
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_the_four_routes() {
        assert_eq!(Route::parse("/"), Some(Route::List));
        assert_eq!(Route::parse(""), Some(Route::List));
        assert_eq!(Route::parse("/create"), Some(Route::Create));
        assert_eq!(Route::parse("/edit/12"), Some(Route::Edit(12)));
        assert_eq!(Route::parse("/post/7/"), Some(Route::Detail(7)));
    }

    #[test]
    fn rejects_unknown_paths_and_bad_ids() {
        assert_eq!(Route::parse("/edit"), None);
        assert_eq!(Route::parse("/edit/abc"), None);
        assert_eq!(Route::parse("/post/0"), None);
        assert_eq!(Route::parse("/posts/1/comments"), None);
    }

    #[test]
    fn paths_round_trip() {
        for route in [Route::List, Route::Create, Route::Edit(4), Route::Detail(9)] {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
    }

    #[test]
    fn back_walks_history_then_falls_back_to_list() {
        let mut router = Router::default();
        assert!(router.navigate(Route::Detail(3)));
        assert!(router.navigate(Route::Edit(3)));
        assert!(!router.navigate(Route::Edit(3)));

        assert_eq!(router.back(), Route::Detail(3));
        assert_eq!(router.back(), Route::List);
        assert!(!router.can_go_back());
        assert_eq!(router.back(), Route::List);
    }

    #[test]
    fn returning_to_list_resets_history() {
        let mut router = Router::default();
        for id in 1..=10 {
            router.navigate(Route::Create);
            router.navigate(Route::List);
            router.navigate(Route::Edit(id));
            router.navigate(Route::List);
        }
        assert!(!router.can_go_back());

        router.navigate(Route::Detail(2));
        assert_eq!(router.back(), Route::List);
    }

    #[test]
    fn history_depth_is_capped() {
        let mut router = Router::default();
        for id in 1..=100 {
            router.navigate(Route::Detail(id));
        }
        let mut steps = 0;
        while router.can_go_back() {
            router.back();
            steps += 1;
        }
        assert_eq!(steps, MAX_HISTORY);
        assert_eq!(router.current(), Route::Detail(100 - MAX_HISTORY as u64));
    }
}
