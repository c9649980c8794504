//! Modules registered into every default [`Registry`](crate::Registry).

const RANDOM: &str = r#"
float base_random(vec2 st) {
    return fract(sin(dot(st, vec2(12.9898, 78.233))) * 43758.5453123);
}

export float random(float v) {
    return base_random(vec2(v, v));
}

overload float random(vec2 v) {
    return base_random(v);
}

overload float random(vec3 v) {
    float r = base_random(vec2(v.x, v.y));
    return base_random(vec2(r, v.z));
}

overload float random(vec4 v) {
    float r1 = base_random(vec2(v.x, v.y));
    float r2 = base_random(vec2(v.z, v.w));
    return base_random(vec2(r1, r2));
}
"#;

const PASS: &str = r#"
export vec4 pass() {
    return texture2D(uTexture, vUV);
}
"#;

const GRAY_SCALE: &str = r#"
export float gray_scale() {
    vec4 color = texture2D(uTexture, vUV);
    return dot(color.rgb, vec3(0.2126, 0.7152, 0.0722));
}
"#;

// neighbor (dx, dy) is weighted by weights[dx + 1][dy + 1]
const CONVOLUTION: &str = r#"
export vec4 convolution(vec2 step, mat3 weights) {
    vec4 sum = vec4(0.0);
    sum += texture2D(uTexture, vUV + step * vec2(-1.0, -1.0)) * weights[0][0];
    sum += texture2D(uTexture, vUV + step * vec2(-1.0,  0.0)) * weights[0][1];
    sum += texture2D(uTexture, vUV + step * vec2(-1.0,  1.0)) * weights[0][2];
    sum += texture2D(uTexture, vUV + step * vec2( 0.0, -1.0)) * weights[1][0];
    sum += texture2D(uTexture, vUV)                           * weights[1][1];
    sum += texture2D(uTexture, vUV + step * vec2( 0.0,  1.0)) * weights[1][2];
    sum += texture2D(uTexture, vUV + step * vec2( 1.0, -1.0)) * weights[2][0];
    sum += texture2D(uTexture, vUV + step * vec2( 1.0,  0.0)) * weights[2][1];
    sum += texture2D(uTexture, vUV + step * vec2( 1.0,  1.0)) * weights[2][2];
    return sum;
}
"#;

/// The built-in library, in registration order.
pub const BUILTIN_LIBRARY: &[&str] = &[RANDOM, PASS, GRAY_SCALE, CONVOLUTION];
