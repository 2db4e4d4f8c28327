// Copyright (c) 2025 Kodama Project. All rights reserved.
// Released under the GPL-3.0 license as described in the file LICENSE.
// Authors: Kokic (@kokic)

use serde::{Deserialize, Serialize};

#[derive(Clone, Deserialize, Debug, Default, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Math {
    /// When `false`, KaTeX renders parse errors inline instead of failing the span.
    pub throw_on_error: bool,

    /// Left-align display math.
    pub fleqn: bool,

    /// Put equation numbers on the left.
    pub leqno: bool,
}
